//! The `quizforge parse` command.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_core::model::{OptionLetter, ParsedQuestion};
use quizforge_core::parser::{self, DiscardReason};

pub fn execute(input: PathBuf, count: Option<usize>, format: String) -> Result<()> {
    let text = read_input(&input)?;
    let quiz = parser::parse(&text, count.unwrap_or(0))?;

    for discard in &quiz.discarded {
        if discard.reason != DiscardReason::Preamble {
            eprintln!("Skipped {discard}");
        }
    }
    if quiz.is_short() {
        eprintln!(
            "Parsed {} of {} requested questions",
            quiz.questions.len(),
            quiz.requested
        );
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&quiz.questions)?),
        "table" => println!("{}", question_table(&quiz.questions)),
        other => anyhow::bail!("unknown format: {other} (expected json or table)"),
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read completion from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))
    }
}

fn question_table(questions: &[ParsedQuestion]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "a", "b", "c", "d", "Answer"]);

    for (i, q) in questions.iter().enumerate() {
        let mut row = vec![Cell::new(i + 1), Cell::new(q.question())];
        row.extend(OptionLetter::ALL.iter().map(|&l| Cell::new(q.option(l))));
        row.push(Cell::new(q.answer()));
        table.add_row(row);
    }

    table
}
