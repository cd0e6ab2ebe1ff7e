//! Quiz generation orchestrator.
//!
//! Renders the quiz prompt, calls the provider with retries on transient
//! errors, and parses the completion into questions.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::error::ProviderError;
use crate::model::{ParsedQuestion, QuizRequest};
use crate::parser::{self, Discard};
use crate::prompt::quiz_prompt;
use crate::traits::{ChatMessage, Completion, CompletionRequest, LlmProvider, TokenUsage};

/// Upper bound for the exponential backoff between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// How provider calls are retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled after each one.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Configuration for the quiz generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model used for quiz generation.
    pub model: String,
    pub retry: RetryPolicy,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "deepseek/deepseek-r1-0528-qwen3-8b:free".into(),
            retry: RetryPolicy::default(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// A parsed quiz together with generation metadata.
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub request: QuizRequest,
    pub questions: Vec<ParsedQuestion>,
    /// Blocks of the completion that were dropped.
    pub discarded: Vec<Discard>,
    /// Model that produced the completion.
    pub model: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
}

/// Generates quizzes from a topic via the provider.
pub struct QuizGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl QuizGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate and parse a quiz.
    ///
    /// Fails on an invalid request, on provider errors that survive the retry
    /// policy, and with [`crate::error::ParseError::EmptyResult`] when the
    /// completion yields no question.
    pub async fn generate(&self, request: &QuizRequest) -> Result<GeneratedQuiz> {
        request.validate().map_err(anyhow::Error::msg)?;

        let completion_request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(quiz_prompt(
                &request.title,
                request.num_questions,
                request.difficulty,
            ))],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::info!(
            topic = %request.title,
            count = request.num_questions,
            difficulty = %request.difficulty,
            "generating quiz"
        );
        let completion =
            complete_with_retry(self.provider.as_ref(), &completion_request, &self.config.retry)
                .await?;
        tracing::debug!("raw completion:\n{}", completion.content);

        let parsed = parser::parse(&completion.content, request.num_questions as usize)?;

        Ok(GeneratedQuiz {
            request: request.clone(),
            questions: parsed.questions,
            discarded: parsed.discarded,
            model: completion.model,
            token_usage: completion.token_usage,
            latency_ms: completion.latency_ms,
        })
    }
}

/// Run a completion, retrying transient provider errors with exponential
/// backoff. Permanent errors (bad key, unknown model) are returned at once and
/// a rate-limit hint replaces the current delay.
pub async fn complete_with_retry(
    provider: &dyn LlmProvider,
    request: &CompletionRequest,
    policy: &RetryPolicy,
) -> Result<Completion> {
    let mut last_error = None;
    let mut retry_delay = policy.retry_delay;

    for retry in 0..=policy.max_retries {
        if retry > 0 {
            tracing::warn!(
                provider = provider.name(),
                "retrying completion in {}ms (attempt {})",
                retry_delay.as_millis(),
                retry + 1
            );
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
        }

        match provider.complete(request).await {
            Ok(completion) => return Ok(completion),
            Err(e) => {
                if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                    if provider_error.is_permanent() {
                        return Err(e);
                    }
                    if let Some(ms) = provider_error.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                    }
                }
                tracing::warn!(provider = provider.name(), "completion failed: {e:#}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}
