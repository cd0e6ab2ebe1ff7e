//! quizforge-providers — model provider integration and configuration.
//!
//! Implements the `LlmProvider` trait for OpenRouter's OpenAI-compatible
//! chat-completions API, plus a mock for tests.

pub mod config;
pub mod mock;
pub mod openrouter;

pub use config::{create_provider, load_config, load_config_from, QuizforgeConfig};
pub use quizforge_core::error::ProviderError;
