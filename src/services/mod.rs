//! Service layer for chat model providers
//!
//! Defines the capability contract a pluggable chat model satisfies
//! (invoke with messages, return completion plus usage) and an explicit
//! name-based registry for constructing adapters by provider tag.

pub mod azure_foundry;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::AdapterConfig,
    error::{FoundryError, Result},
    messages::Message,
};

/// Options for a single invoke call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokeOptions {
    /// Response format hint forwarded to the endpoint as `response_format`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,

    /// Free-form parameters merged into the request body as-is
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Token usage reported by the provider for one completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an invoke call, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Text content of the first returned choice
    pub completion: String,

    /// Token accounting for the round trip
    pub usage: Usage,
}

/// Core trait for chat model adapters
///
/// Abstracts over provider APIs and gives the host a unified interface
/// for making completion requests.
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Get the provider tag (e.g., "azure_foundry")
    fn provider(&self) -> &str;

    /// Get the configured model identifier
    fn model(&self) -> &str;

    /// Send the message sequence and return the completion
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-success responses,
    /// or responses missing the fields a completion needs.
    async fn invoke(
        &self,
        messages: &[Message],
        options: InvokeOptions,
    ) -> Result<CompletionResult>;
}

/// Constructor signature stored in a [`ProviderRegistry`]
pub type AdapterConstructor = fn(AdapterConfig) -> Result<Box<dyn ChatModel>>;

/// Explicit mapping from provider tag to adapter constructor
///
/// Built once at startup and passed to whichever component performs
/// name-based dispatch; there is no global lookup table.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: HashMap<&'static str, AdapterConstructor>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in providers registered
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(azure_foundry::PROVIDER, |config| {
            Ok(Box::new(azure_foundry::ChatAzureFoundry::new(config)?))
        });
        registry
    }

    /// Register a constructor under `tag`, replacing any previous entry
    pub fn register(&mut self, tag: &'static str, constructor: AdapterConstructor) {
        self.constructors.insert(tag, constructor);
    }

    /// Construct the adapter registered under `tag`
    ///
    /// # Errors
    ///
    /// Returns [`FoundryError::UnknownProvider`] if no constructor is
    /// registered under `tag`, or the constructor's own error.
    pub fn create(&self, tag: &str, config: AdapterConfig) -> Result<Box<dyn ChatModel>> {
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| FoundryError::UnknownProvider(tag.to_string()))?;
        constructor(config)
    }

    /// Iterate over the registered provider tags
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}
