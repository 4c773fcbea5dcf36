//! Lexcard LLM Provider Layer
//!
//! Implementations of the [`ChatModel`] trait from `lexcard-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: scripted, deterministic responses for testing
//! - `OpenAiCompatibleProvider`: any `/chat/completions` endpoint (DeepSeek,
//!   OpenAI, local gateways)
//!
//! Both honour the `ChatModel` contract: a failed call yields `""`, never an
//! error past the trait boundary.
//!
//! [`chat_all`] fans a batch of requests out over the blocking pool with a
//! concurrency limit and hands the replies back in submission order.
//!
//! # Examples
//!
//! ```
//! use lexcard_llm::MockProvider;
//! use lexcard_domain::{ChatModel, ChatRequest};
//!
//! let provider = MockProvider::new(r#"{"items": []}"#);
//! let reply = provider.chat(&ChatRequest::new("sys", "text", "m", 0.0));
//! assert_eq!(reply, r#"{"items": []}"#);
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod openai;

use lexcard_domain::{ChatModel, ChatRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use batch::chat_all;
pub use openai::OpenAiCompatibleProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credentials rejected by the endpoint
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// How a scripted rule answers
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure,
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<(String, Reply)>,
    queue: VecDeque<String>,
    requests: Vec<ChatRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
/// 1. the first rule whose key occurs in the last user message,
/// 2. the next queued response, if any remain,
/// 3. the default response.
///
/// Every request is recorded so tests can inspect prompts and call counts.
///
/// # Examples
///
/// ```
/// use lexcard_llm::MockProvider;
/// use lexcard_domain::{ChatModel, ChatRequest};
///
/// let mut provider = MockProvider::default();
/// provider.add_response("第一条", r#"{"items": [{"type": "Statute"}]}"#);
/// provider.add_failure("第二条");
///
/// let req = |text: &str| ChatRequest::new("sys", text, "m", 0.0);
/// assert!(provider.chat(&req("……第一条……")).contains("Statute"));
/// assert_eq!(provider.chat(&req("……第二条……")), "");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<Script>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Create a provider that returns `responses` in order, then `""`
    pub fn sequence<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new("");
        provider.script().queue = responses.into_iter().map(Into::into).collect();
        provider
    }

    /// Reply with `response` whenever the user message contains `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.script().rules.push((key.into(), Reply::Text(response.into())));
    }

    /// Simulate a failed call (empty reply) whenever the user message contains `key`
    pub fn add_failure(&mut self, key: impl Into<String>) {
        self.script().rules.push((key.into(), Reply::Failure));
    }

    /// Get the number of times `chat` was called
    pub fn call_count(&self) -> usize {
        self.script().requests.len()
    }

    /// All requests received so far, in call order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.script().requests.clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        self.script().requests.clear();
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("")
    }
}

impl ChatModel for MockProvider {
    fn chat(&self, request: &ChatRequest) -> String {
        let mut script = self.script();
        script.requests.push(request.clone());

        let content = request.user_content();
        let matched = script
            .rules
            .iter()
            .find(|(key, _)| content.contains(key.as_str()))
            .map(|(_, reply)| reply.clone());

        match matched {
            Some(Reply::Text(text)) => text,
            Some(Reply::Failure) => String::new(),
            None => script
                .queue
                .pop_front()
                .unwrap_or_else(|| self.default_response.clone()),
        }
    }
}
