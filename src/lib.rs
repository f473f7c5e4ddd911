//! foundry-chat: Azure AI Foundry chat-completions adapter
//!
//! This library translates a host framework's role-tagged chat messages
//! into the Azure AI Model Inference request shape, issues a single
//! completion call, and reshapes the response into a completion-plus-usage
//! record. Adapters are selected either directly or by provider tag
//! through an explicit [`services::ProviderRegistry`].

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod messages;
pub mod services;

// Re-exports for convenience
pub use config::AdapterConfig;
pub use error::{FoundryError, Result};
pub use messages::{Message, Role};
pub use services::azure_foundry::ChatAzureFoundry;
pub use services::{ChatModel, CompletionResult, InvokeOptions, ProviderRegistry, Usage};
