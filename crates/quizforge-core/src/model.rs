//! Core data model types for quizforge.
//!
//! These are the fundamental types that the whole workspace uses to represent
//! parsed questions, quiz requests, and stored quizzes and users.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest number of questions a quiz may request.
pub const MIN_QUESTIONS: u32 = 1;
/// Largest number of questions a quiz may request.
pub const MAX_QUESTIONS: u32 = 50;

/// One of the four option slots of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    /// All letters in display order.
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// Map a character to a letter, ignoring ASCII case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(OptionLetter::A),
            'b' => Some(OptionLetter::B),
            'c' => Some(OptionLetter::C),
            'd' => Some(OptionLetter::D),
            _ => None,
        }
    }

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'a',
            OptionLetter::B => 'b',
            OptionLetter::C => 'c',
            OptionLetter::D => 'd',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                OptionLetter::from_char(c).ok_or_else(|| format!("unknown option letter: {s}"))
            }
            _ => Err(format!("unknown option letter: {s}")),
        }
    }
}

/// A fully validated multiple-choice question.
///
/// Every field is non-empty and `answer` names a populated option. The only
/// way to build one is [`ParsedQuestion::new`], which enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct ParsedQuestion {
    question: String,
    options: [String; 4],
    answer: OptionLetter,
}

/// Why a question failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionDefect {
    EmptyQuestion,
    MissingOption(OptionLetter),
}

impl fmt::Display for QuestionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionDefect::EmptyQuestion => write!(f, "question text is empty"),
            QuestionDefect::MissingOption(letter) => write!(f, "option {letter}) is empty"),
        }
    }
}

impl ParsedQuestion {
    /// Validate and build a question.
    pub fn new(
        question: impl Into<String>,
        options: [String; 4],
        answer: OptionLetter,
    ) -> Result<Self, QuestionDefect> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionDefect::EmptyQuestion);
        }
        if let Some(letter) = OptionLetter::ALL
            .into_iter()
            .find(|l| options[l.index()].trim().is_empty())
        {
            return Err(QuestionDefect::MissingOption(letter));
        }
        Ok(Self {
            question,
            options,
            answer,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn option(&self, letter: OptionLetter) -> &str {
        &self.options[letter.index()]
    }

    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    pub fn answer(&self) -> OptionLetter {
        self.answer
    }

    /// Text of the correct option.
    pub fn answer_text(&self) -> &str {
        self.option(self.answer)
    }
}

/// Flat wire shape of a question (`{question, a, b, c, d, answer}`).
#[derive(Serialize, Deserialize)]
struct RawQuestion {
    question: String,
    a: String,
    b: String,
    c: String,
    d: String,
    answer: OptionLetter,
}

impl TryFrom<RawQuestion> for ParsedQuestion {
    type Error = String;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        ParsedQuestion::new(raw.question, [raw.a, raw.b, raw.c, raw.d], raw.answer)
            .map_err(|e| e.to_string())
    }
}

impl From<ParsedQuestion> for RawQuestion {
    fn from(q: ParsedQuestion) -> Self {
        let [a, b, c, d] = q.options;
        RawQuestion {
            question: q.question,
            a,
            b,
            c,
            d,
            answer: q.answer,
        }
    }
}

/// Requested difficulty of a generated quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A request to generate a quiz on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    /// Topic of the quiz; also used as its title.
    pub title: String,
    /// How many questions to ask the model for.
    pub num_questions: u32,
    pub difficulty: Difficulty,
}

impl QuizRequest {
    pub fn new(title: impl Into<String>, num_questions: u32, difficulty: Difficulty) -> Self {
        Self {
            title: title.into(),
            num_questions,
            difficulty,
        }
    }

    /// Check the request before any model call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("quiz title must not be empty".into());
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(format!(
                "number of questions must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {}",
                self.num_questions
            ));
        }
        Ok(())
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    /// Normalized (trimmed, lowercased) email.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A quiz about to be persisted.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub num_questions: u32,
    pub questions: Vec<ParsedQuestion>,
    pub owner: Uuid,
}

/// A persisted quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub id: Uuid,
    pub title: String,
    /// Number of questions originally requested.
    pub num_questions: u32,
    pub questions: Vec<ParsedQuestion>,
    #[serde(rename = "userId")]
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(a: &str, b: &str, c: &str, d: &str) -> [String; 4] {
        [a.into(), b.into(), c.into(), d.into()]
    }

    #[test]
    fn option_letter_parse_and_display() {
        assert_eq!("a".parse::<OptionLetter>().unwrap(), OptionLetter::A);
        assert_eq!("D".parse::<OptionLetter>().unwrap(), OptionLetter::D);
        assert!("e".parse::<OptionLetter>().is_err());
        assert!("ab".parse::<OptionLetter>().is_err());
        assert_eq!(OptionLetter::C.to_string(), "c");
        assert_eq!(OptionLetter::from_char('B'), Some(OptionLetter::B));
    }

    #[test]
    fn question_rejects_empty_stem() {
        let err = ParsedQuestion::new("  ", opts("1", "2", "3", "4"), OptionLetter::A).unwrap_err();
        assert_eq!(err, QuestionDefect::EmptyQuestion);
    }

    #[test]
    fn question_rejects_missing_option() {
        let err = ParsedQuestion::new("Q?", opts("1", "2", "", "4"), OptionLetter::A).unwrap_err();
        assert_eq!(err, QuestionDefect::MissingOption(OptionLetter::C));
    }

    #[test]
    fn question_serializes_flat() {
        let q = ParsedQuestion::new("2 + 2?", opts("3", "4", "5", "6"), OptionLetter::B).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "question": "2 + 2?",
                "a": "3",
                "b": "4",
                "c": "5",
                "d": "6",
                "answer": "b"
            })
        );
        assert_eq!(q.answer_text(), "4");
    }

    #[test]
    fn invalid_wire_question_is_rejected() {
        let json = r#"{"question":"Q","a":"1","b":"2","c":"3","d":"","answer":"a"}"#;
        assert!(serde_json::from_str::<ParsedQuestion>(json).is_err());
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn quiz_request_validation() {
        assert!(QuizRequest::new("Rust", 5, Difficulty::Easy).validate().is_ok());
        assert!(QuizRequest::new("  ", 5, Difficulty::Easy).validate().is_err());
        assert!(QuizRequest::new("Rust", 0, Difficulty::Easy).validate().is_err());
        assert!(QuizRequest::new("Rust", 51, Difficulty::Easy).validate().is_err());
    }

    #[test]
    fn quiz_request_uses_camel_case() {
        let req: QuizRequest =
            serde_json::from_str(r#"{"title":"Go","numQuestions":3,"difficulty":"hard"}"#).unwrap();
        assert_eq!(req.num_questions, 3);
        assert_eq!(req.difficulty, Difficulty::Hard);
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
