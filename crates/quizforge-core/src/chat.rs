//! Free-form chat with the model about quiz topics.

use std::sync::Arc;

use anyhow::Result;

use crate::generator::{complete_with_retry, RetryPolicy};
use crate::prompt::CHAT_SYSTEM_PROMPT;
use crate::traits::{ChatMessage, CompletionRequest, LlmProvider};

/// Configuration for chat replies.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "deepseek/deepseek-chat-v3-0324:free".into(),
            temperature: 0.7,
            max_tokens: 500,
            retry: RetryPolicy {
                max_retries: 0,
                ..Default::default()
            },
        }
    }
}

/// Answers chat conversations under a fixed system prompt.
pub struct ChatService {
    provider: Arc<dyn LlmProvider>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(provider: Arc<dyn LlmProvider>, config: ChatConfig) -> Self {
        Self { provider, config }
    }

    /// Reply to a conversation. `messages` must not be empty.
    pub async fn reply(&self, messages: &[ChatMessage]) -> Result<String> {
        anyhow::ensure!(!messages.is_empty(), "no messages provided for chat");

        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));
        conversation.extend(messages.iter().cloned());

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: conversation,
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        };

        let completion =
            complete_with_retry(self.provider.as_ref(), &request, &self.config.retry).await?;
        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::traits::{Completion, TokenUsage};

    #[derive(Default)]
    struct EchoProvider {
        last: Mutex<Option<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
            *self.last.lock().unwrap() = Some(request.clone());
            let last = request.messages.last().map(|m| m.content.clone());
            Ok(Completion {
                content: format!("echo: {}", last.unwrap_or_default()),
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn prepends_system_prompt() {
        let provider = Arc::new(EchoProvider::default());
        let chat = ChatService::new(provider.clone(), ChatConfig::default());

        let reply = chat
            .reply(&[
                ChatMessage::user("What is a closure?"),
                ChatMessage::assistant("A function value."),
                ChatMessage::user("Give an example"),
            ])
            .await
            .unwrap();
        assert_eq!(reply, "echo: Give an example");

        let request = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0], ChatMessage::system(CHAT_SYSTEM_PROMPT));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(500));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let chat = ChatService::new(Arc::new(EchoProvider::default()), ChatConfig::default());
        assert!(chat.reply(&[]).await.is_err());
    }
}
