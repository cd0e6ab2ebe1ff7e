//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export OPENROUTER_API_KEY and JWT_SECRET (or put them in .env)");
    println!("  2. Run: quizforge generate --topic \"Rust ownership\" --count 5");
    println!("  3. Run: quizforge serve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

quiz_model = "deepseek/deepseek-r1-0528-qwen3-8b:free"
chat_model = "deepseek/deepseek-chat-v3-0324:free"
max_retries = 3
retry_delay_ms = 1000

[provider]
api_key = "${OPENROUTER_API_KEY}"
base_url = "https://openrouter.ai/api"
referer = "http://localhost:3000"
app_title = "AI Quiz Generator"
timeout_secs = 120

[server]
addr = "127.0.0.1:5000"
jwt_secret = "${JWT_SECRET}"
token_ttl_secs = 3600
data_file = "quizforge-data.json"
"#;
