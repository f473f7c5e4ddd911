//! Adapter configuration
//!
//! Endpoint and credential may be omitted here and resolved from the
//! process environment when the adapter is constructed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when [`AdapterConfig::endpoint`] is unset
pub const ENDPOINT_ENV: &str = "AZURE_INFERENCE_ENDPOINT";

/// Environment variable consulted when [`AdapterConfig::api_key`] is unset
pub const CREDENTIAL_ENV: &str = "AZURE_INFERENCE_CREDENTIAL";

/// Configuration for a chat model adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Inference endpoint URL (falls back to [`ENDPOINT_ENV`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key (falls back to [`CREDENTIAL_ENV`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Deadline applied to each request; unset means no client-side limit
    #[serde(skip)]
    pub request_timeout: Option<Duration>,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    1000
}

impl AdapterConfig {
    /// Create a configuration for `model` with default sampling settings
    /// and endpoint/credential left to environment resolution
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            endpoint: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout: None,
        }
    }
}
