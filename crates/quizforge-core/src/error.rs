//! Error types shared across the workspace.
//!
//! `ProviderError` lives here (not in `quizforge-providers`) so the quiz
//! generator can downcast and classify failures for retry decisions without
//! string matching.

use thiserror::Error;

use crate::parser::Discard;

/// Errors that can occur when interacting with the model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The API answered but the completion carried no text.
    #[error("empty completion from model {0}")]
    EmptyCompletion(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Terminal failure of a parse call.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No block of the completion produced a valid question.
    #[error("no questions could be parsed from {blocks} block(s)")]
    EmptyResult {
        /// Number of blocks the completion was segmented into.
        blocks: usize,
        /// Why each block was dropped.
        discarded: Vec<Discard>,
    },
}

/// Errors raised by user and quiz stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user with this email already exists.
    #[error("user already exists: {0}")]
    DuplicateEmail(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be (de)serialized.
    #[error("storage data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
