//! OpenAI-compatible Provider Implementation
//!
//! Talks to any endpoint that implements `POST {base}/chat/completions`
//! (DeepSeek, OpenAI, vLLM and similar gateways).
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Retry logic with exponential backoff on network errors, 429 and 5xx
//! - Request timeout
//! - Failures collapse to `""` at the [`ChatModel`] boundary
//!
//! # Examples
//!
//! ```no_run
//! use lexcard_llm::OpenAiCompatibleProvider;
//! use lexcard_domain::{ChatModel, ChatRequest};
//!
//! let provider = OpenAiCompatibleProvider::new("https://api.deepseek.com/v1", "sk-...")?;
//! let reply = provider.chat(&ChatRequest::new("system", "hello", "DeepSeek-V3", 0.2));
//! # Ok::<(), lexcard_llm::LlmError>(())
//! ```

use crate::LlmError;
use lexcard_domain::{ChatMessage, ChatModel, ChatRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::runtime::RuntimeFlavor;
use tracing::{debug, warn};

/// Default timeout for a single chat request (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per chat request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Provider for OpenAI-compatible chat completion APIs
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, e.g. `https://api.deepseek.com/v1` (a trailing
    ///   slash is ignored)
    /// - `api_key`: bearer token
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] when either value is empty or the HTTP
    /// client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let mut base_url = base_url.into().trim().to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let api_key = api_key.into().trim().to_string();

        if base_url.is_empty() {
            return Err(LlmError::Config("api_base must not be empty".to_string()));
        }
        if api_key.is_empty() {
            return Err(LlmError::Config("api_key must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts per request (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the endpoint is unreachable after all retries
    /// - the credentials are rejected (no retry)
    /// - the model does not exist (no retry)
    /// - the response body is not a chat completion
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<CompletionResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return Ok(parsed
                            .choices
                            .into_iter()
                            .next()
                            .and_then(|c| c.message.content)
                            .unwrap_or_default());
                    }

                    match status {
                        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                            return Err(LlmError::Authentication(format!("HTTP {}", status)));
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(request.model.clone()));
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        _ => {
                            let error_text = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Unknown error".to_string());
                            last_error = Some(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                status, error_text
                            )));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!("Retrying chat request in {:?} (attempt {})", delay, attempts + 1);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    /// Blocking wrapper around [`complete`](Self::complete)
    ///
    /// Without an ambient runtime a current-thread runtime is built for the
    /// call. On a multi-thread runtime the call goes through
    /// `block_in_place`, so calling from an async task is safe there. On a
    /// current-thread runtime it must run off the async task (for example via
    /// [`chat_all`](crate::chat_all), which uses `spawn_blocking`).
    fn complete_blocking(&self, request: &ChatRequest) -> Result<String, LlmError> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| handle.block_on(self.complete(request)))
                }
                _ => handle.block_on(self.complete(request)),
            },
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Config(format!("Failed to start runtime: {}", e)))?
                .block_on(self.complete(request)),
        }
    }
}

/// Synchronous facade over [`OpenAiCompatibleProvider::complete`]
///
/// Safe from plain threads, blocking-pool threads and multi-thread runtime
/// tasks. Calling it directly from a task on a current-thread runtime panics;
/// use [`chat_all`](crate::chat_all) there.
impl ChatModel for OpenAiCompatibleProvider {
    fn chat(&self, request: &ChatRequest) -> String {
        match self.complete_blocking(request) {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %request.model, "Chat call failed: {}", e);
                String::new()
            }
        }
    }
}
