//! The `quizforge chat` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::chat::ChatService;
use quizforge_core::traits::ChatMessage;
use quizforge_providers::config::load_config_from;
use quizforge_providers::create_provider;

pub async fn execute(message: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = create_provider(&config.provider)?;
    let chat = ChatService::new(provider, config.chat_config());

    let reply = chat.reply(&[ChatMessage::user(message)]).await?;
    println!("{reply}");

    Ok(())
}
