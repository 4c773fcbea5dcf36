//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the card pipeline and its
//! collaborators. Implementations live in other crates (`lexcard-llm`,
//! `lexcard-ingest`, `lexcard-anki`).

use crate::Card;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    System,
    /// The request itself
    User,
    /// A prior model turn
    Assistant,
}

/// One message of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A system message
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Conversation, system message first
    pub messages: Vec<ChatMessage>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Optional completion length limit
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build a system + user request
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }

    /// Text of the last user message (empty when there is none)
    pub fn user_content(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Trait for language-model chat calls
///
/// Implemented by the infrastructure layer (lexcard-llm).
///
/// `chat` never fails: on any error (auth, network, malformed request) an
/// implementation returns an empty string, and callers treat empty or
/// unparseable text as "no data produced". Implementations enforce their own
/// timeouts and retries.
pub trait ChatModel: Send + Sync {
    /// Run one chat completion and return the reply text
    fn chat(&self, request: &ChatRequest) -> String;
}

/// Text and page count read from one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedText {
    /// Extracted text (empty for recognized-but-empty files)
    pub text: String,
    /// Page count (0 when the format has no pages)
    pub page_count: u32,
}

/// Trait for reading source documents
///
/// Implemented by the infrastructure layer (lexcard-ingest).
pub trait DocumentLoader {
    /// Error type for load operations
    type Error: std::fmt::Display;

    /// Whether this loader understands the file; unsupported files are skipped
    fn supports(&self, path: &Path) -> bool;

    /// Read text and page count from a supported file
    fn load(&self, path: &Path) -> Result<LoadedText, Self::Error>;
}

/// Trait for writing a flashcard package
///
/// Implemented by the infrastructure layer (lexcard-anki).
pub trait PackageExporter {
    /// Error type for export operations
    type Error: std::fmt::Display;

    /// Write `cards` into a package named after `deck_name` and return its path
    fn export(&self, deck_name: &str, cards: &[Card]) -> Result<PathBuf, Self::Error>;
}
