//! Configuration loading and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::chat::ChatConfig;
use quizforge_core::generator::{GeneratorConfig, RetryPolicy};
use quizforge_core::traits::LlmProvider;

use crate::openrouter::{OpenRouterProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Connection settings for the model provider.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `HTTP-Referer`.
    #[serde(default)]
    pub referer: Option<String>,
    /// Sent as `X-Title`.
    #[serde(default)]
    pub app_title: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            referer: None,
            app_title: Some(default_app_title()),
            timeout_secs: default_timeout(),
        }
    }
}

/// Settings for the REST server.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// JSON file backing users and quizzes; in-memory when unset.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("addr", &self.addr)
            .field("jwt_secret", &"***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("data_file", &self.data_file)
            .finish()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            data_file: None,
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Model used to generate quizzes.
    #[serde(default = "default_quiz_model")]
    pub quiz_model: String,
    /// Model used for chat.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_app_title() -> String {
    "AI Quiz Generator".to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_addr() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_token_ttl() -> u64 {
    3600
}
fn default_quiz_model() -> String {
    GeneratorConfig::default().model
}
fn default_chat_model() -> String {
    ChatConfig::default().model
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            quiz_model: default_quiz_model(),
            chat_model: default_chat_model(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            server: ServerSettings::default(),
        }
    }
}

impl QuizforgeConfig {
    /// Generator settings derived from this config.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.quiz_model.clone(),
            retry: RetryPolicy {
                max_retries: self.max_retries,
                retry_delay: Duration::from_millis(self.retry_delay_ms),
            },
            ..Default::default()
        }
    }

    /// Chat settings derived from this config.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            model: self.chat_model.clone(),
            ..Default::default()
        }
    }

    /// Override fields from environment variables, looked up through `var`.
    ///
    /// `QUIZFORGE_API_KEY` (or `OPENROUTER_API_KEY`) sets the API key,
    /// `JWT_SECRET` the token secret, and `QUIZFORGE_ADDR` the listen address.
    /// A bare `PORT` binds all interfaces on that port.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("QUIZFORGE_API_KEY").or_else(|| var("OPENROUTER_API_KEY")) {
            self.provider.api_key = key;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.server.jwt_secret = secret;
        }
        if let Some(addr) = var("QUIZFORGE_ADDR") {
            self.server.addr = addr;
        } else if let Some(port) = var("PORT") {
            self.server.addr = format!("0.0.0.0:{port}");
        }
    }

    /// Resolve `${VAR}` references from the file, then apply overrides.
    /// Override values are used as given.
    fn with_environment(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        self.resolve_env_vars();
        self.apply_env_overrides(var);
        self
    }

    /// Replace `${VAR}` references in string settings.
    fn resolve_env_vars(&mut self) {
        let p = &mut self.provider;
        p.api_key = resolve_env_vars(&p.api_key);
        p.base_url = resolve_env_vars(&p.base_url);
        p.referer = p.referer.as_deref().map(resolve_env_vars);
        p.app_title = p.app_title.as_deref().map(resolve_env_vars);
        self.server.jwt_secret = resolve_env_vars(&self.server.jwt_secret);
        self.server.addr = resolve_env_vars(&self.server.addr);
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variables override file values; see
/// [`QuizforgeConfig::apply_env_overrides`].
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    Ok(config.with_environment(|name| std::env::var(name).ok()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Create the provider described by `settings`.
pub fn create_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>> {
    if settings.api_key.trim().is_empty() {
        anyhow::bail!(
            "no API key configured; set OPENROUTER_API_KEY or `api_key` under [provider]"
        );
    }
    let provider = OpenRouterProvider::with_timeout(
        &settings.api_key,
        Some(settings.base_url.clone()),
        settings.timeout_secs,
    )?
    .with_attribution(settings.referer.clone(), settings.app_title.clone());
    Ok(Arc::new(provider))
}
