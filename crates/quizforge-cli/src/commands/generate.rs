//! The `quizforge generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use quizforge_core::generator::QuizGenerator;
use quizforge_core::model::{Difficulty, ParsedQuestion, QuizRequest};
use quizforge_providers::config::load_config_from;
use quizforge_providers::create_provider;

/// Quiz written to the output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizOutput<'a> {
    title: &'a str,
    num_questions: u32,
    difficulty: Difficulty,
    model: &'a str,
    questions: &'a [ParsedQuestion],
}

pub async fn execute(
    topic: String,
    count: u32,
    difficulty: String,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let difficulty: Difficulty = difficulty.parse().map_err(anyhow::Error::msg)?;
    let request = QuizRequest::new(topic, count, difficulty);
    request.validate().map_err(anyhow::Error::msg)?;

    let config = load_config_from(config_path.as_deref())?;
    let provider = create_provider(&config.provider)?;
    let generator = QuizGenerator::new(provider, config.generator_config());

    eprintln!(
        "Generating {} {} questions on \"{}\" with {}...",
        request.num_questions,
        request.difficulty,
        request.title,
        generator.config().model
    );
    let quiz = generator.generate(&request).await?;

    eprintln!(
        "Got {}/{} questions ({} tokens, {}ms)",
        quiz.questions.len(),
        request.num_questions,
        quiz.token_usage.total_tokens,
        quiz.latency_ms
    );
    for discard in &quiz.discarded {
        tracing::debug!("skipped {discard}");
    }

    let json = serde_json::to_string_pretty(&QuizOutput {
        title: &request.title,
        num_questions: request.num_questions,
        difficulty: request.difficulty,
        model: &quiz.model,
        questions: &quiz.questions,
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
