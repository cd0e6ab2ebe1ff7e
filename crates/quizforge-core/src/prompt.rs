//! Prompt templates sent to the model.

use crate::model::Difficulty;

/// System prompt for free-form chat.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant focused on providing clear and concise answers related to quiz topics. Be polite and informative.";

/// Render the quiz-generation prompt.
///
/// The output format shown to the model is the one [`crate::parser`] reads.
pub fn quiz_prompt(topic: &str, count: u32, difficulty: Difficulty) -> String {
    format!(
        "Generate {count} {difficulty} level multiple-choice quiz questions on the topic: \"{topic}\". \
         Each question should have 4 options (a-d) and specify the correct answer.\
         Please give output in this format, i dont need any explanation.\n\
         Format:\n\
         **1. Question?**\n\
         - a) ...\n\
         - b) ...\n\
         - c) ...\n\
         - d) ...\n\
         **Answer: a**"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn prompt_mentions_parameters() {
        let prompt = quiz_prompt("Rust ownership", 7, Difficulty::Hard);
        assert!(prompt.starts_with(
            "Generate 7 hard level multiple-choice quiz questions on the topic: \"Rust ownership\"."
        ));
        assert!(prompt.ends_with("**Answer: a**"));
    }

    #[test]
    fn prompt_format_section_is_parseable() {
        let prompt = quiz_prompt("anything", 1, Difficulty::Easy);
        let format = prompt.split("Format:\n").nth(1).unwrap();
        // The template itself uses "..." placeholders, which are valid options.
        let quiz = parser::parse(format, 1).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].question(), "Question?");
    }
}
