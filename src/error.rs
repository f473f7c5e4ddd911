//! Error types for foundry-chat

use thiserror::Error;

/// Result type alias using [`FoundryError`]
pub type Result<T> = std::result::Result<T, FoundryError>;

/// Main error type for foundry-chat
#[derive(Debug, Error)]
pub enum FoundryError {
    /// Configuration resolution or validation error
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error reported by the inference endpoint, or a response missing
    /// the fields a completion needs
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No constructor registered for the requested provider tag
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
