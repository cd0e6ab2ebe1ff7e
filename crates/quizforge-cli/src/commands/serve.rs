//! The `quizforge serve` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use quizforge_core::chat::ChatService;
use quizforge_core::generator::QuizGenerator;
use quizforge_providers::config::load_config_from;
use quizforge_providers::create_provider;
use quizforge_server::{AppState, AuthConfig};
use quizforge_store::{JsonFileStore, MemoryStore};

pub async fn execute(
    addr: Option<String>,
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let addr = addr.unwrap_or_else(|| config.server.addr.clone());

    let auth = AuthConfig::new(
        config.server.jwt_secret.clone(),
        Duration::from_secs(config.server.token_ttl_secs),
    )?;
    let provider = create_provider(&config.provider)?;
    let generator = QuizGenerator::new(provider.clone(), config.generator_config());
    let chat = ChatService::new(provider, config.chat_config());

    let state = match data.or_else(|| config.server.data_file.clone()) {
        Some(path) => {
            let store = JsonFileStore::open(&path).await?;
            AppState::new(Arc::new(store), generator, chat, auth)
        }
        None => {
            tracing::warn!("no data file configured; users and quizzes live in memory only");
            AppState::new(Arc::new(MemoryStore::new()), generator, chat, auth)
        }
    };

    quizforge_server::serve(&addr, state).await
}
