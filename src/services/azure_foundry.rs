//! Azure AI Foundry chat adapter
//!
//! Talks to the Azure AI Model Inference chat-completions surface used by
//! Foundry serverless and managed endpoints. One request per invoke, no
//! streaming, no retries.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{AdapterConfig, CREDENTIAL_ENV, ENDPOINT_ENV},
    error::{FoundryError, Result},
    messages::{Message, Role},
};

use super::{ChatModel, CompletionResult, InvokeOptions, Usage};

/// Provider tag for registry dispatch
pub const PROVIDER: &str = "azure_foundry";

/// API version sent as a query parameter with every request
const API_VERSION: &str = "2024-05-01-preview";

/// Handle to one inference endpoint
///
/// Carries the authenticated HTTP client and the normalized endpoint URL.
/// Built at most once per adapter instance.
#[derive(Debug)]
pub struct FoundryClient {
    http: Client,
    endpoint: String,
}

impl FoundryClient {
    fn new(endpoint: &str, api_key: &str, request_timeout: Option<Duration>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(api_key)
                .map_err(|_| FoundryError::Config("Invalid API key format".to_string()))?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Issue one chat-completions request and deserialize the response
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut call = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .query(&[("api-version", API_VERSION)]);

        // The inference surface rejects unknown body fields unless asked
        // to forward them to the model.
        if !request.extra.is_empty() {
            call = call.header("extra-parameters", "pass-through");
        }

        let response = call.json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            warn!(%status, "chat completion request failed");
            return Err(FoundryError::Api {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        Ok(response.json().await?)
    }
}

/// Azure AI Foundry chat adapter
///
/// Constructed from an [`AdapterConfig`]; endpoint and credential fall
/// back to `AZURE_INFERENCE_ENDPOINT` / `AZURE_INFERENCE_CREDENTIAL`.
#[derive(Debug)]
pub struct ChatAzureFoundry {
    model: String,
    endpoint: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    request_timeout: Option<Duration>,
    client: OnceCell<FoundryClient>,
}

impl ChatAzureFoundry {
    /// Create a new adapter, resolving endpoint and credential from the
    /// environment where the config leaves them unset
    ///
    /// No network connection is opened here; the HTTP client is built on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`FoundryError::Config`] if endpoint or credential is
    /// still missing after environment resolution.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let endpoint = resolve(config.endpoint, ENDPOINT_ENV);
        let api_key = resolve(config.api_key, CREDENTIAL_ENV);

        let (Some(endpoint), Some(api_key)) = (endpoint, api_key) else {
            return Err(FoundryError::Config(
                "Azure Inference endpoint and API key must be provided".to_string(),
            ));
        };

        Ok(Self {
            model: config.model,
            endpoint,
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: config.request_timeout,
            client: OnceCell::new(),
        })
    }

    /// Get the vendor client handle, building and caching it on first use
    ///
    /// Subsequent calls return the same handle; concurrent first calls
    /// initialize it exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn client(&self) -> Result<&FoundryClient> {
        self.client.get_or_try_init(|| {
            FoundryClient::new(&self.endpoint, &self.api_key, self.request_timeout)
        })
    }

    /// Convert host messages to the wire format, preserving order
    ///
    /// Roles the endpoint does not accept are dropped from the sequence
    /// and logged.
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => {
                        warn!("dropping tool-role message the endpoint does not accept");
                        return None;
                    }
                };
                Some(WireMessage {
                    role: role.to_string(),
                    content: msg.content.clone(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for ChatAzureFoundry {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        messages: &[Message],
        options: InvokeOptions,
    ) -> Result<CompletionResult> {
        let client = self.client()?;

        let wire_messages = Self::convert_messages(messages);
        debug!(
            model = %self.model,
            messages = wire_messages.len(),
            "sending chat completion request"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: wire_messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: options.response_format,
            extra: options.extra,
        };

        let response = client.complete(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FoundryError::Api {
                provider: PROVIDER.to_string(),
                message: "No choices in response".to_string(),
            })?;

        let completion = choice.message.content.ok_or_else(|| FoundryError::Api {
            provider: PROVIDER.to_string(),
            message: "Choice has no message content".to_string(),
        })?;

        let usage = response.usage.ok_or_else(|| FoundryError::Api {
            provider: PROVIDER.to_string(),
            message: "No usage in response".to_string(),
        })?;

        Ok(CompletionResult {
            completion,
            usage: Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }
}

fn resolve(value: Option<String>, var: &str) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

// Azure AI Model Inference wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatResponse {
    choices: Vec<WireChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<WireUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireResponseMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
