//! Core trait definitions for the model provider and the stores.
//!
//! The provider trait is implemented by `quizforge-providers`, the store
//! traits by `quizforge-store`.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{NewQuiz, QuizRecord, UserRecord};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for the chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Run one chat completion.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion>;
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::System => write!(f, "system"),
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "deepseek/deepseek-chat-v3-0324:free").
    pub model: String,
    /// Conversation, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; provider default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate; provider default when unset.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Response to a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Text of the first choice.
    pub content: String,
    /// Model that actually produced the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// ---------------------------------------------------------------------------
// Store traits
// ---------------------------------------------------------------------------

/// Persistence of registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user. Fails with [`StoreError::DuplicateEmail`] if the
    /// normalized email is taken.
    async fn create_user(&self, email: &str, password_hash: &str)
        -> Result<UserRecord, StoreError>;

    /// Look a user up by (unnormalized) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// Persistence of generated quizzes.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Store a quiz under a fresh id.
    async fn insert_quiz(&self, quiz: NewQuiz) -> Result<QuizRecord, StoreError>;

    async fn get_quiz(&self, id: Uuid) -> Result<Option<QuizRecord>, StoreError>;

    /// Quizzes owned by `owner`, newest first.
    async fn list_quizzes(&self, owner: Uuid) -> Result<Vec<QuizRecord>, StoreError>;

    /// Delete a quiz if `owner` owns it. Returns whether anything was deleted.
    async fn delete_quiz(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}
