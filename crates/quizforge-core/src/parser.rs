//! Quiz-text parser.
//!
//! Turns a free-form model completion into validated [`ParsedQuestion`]s.
//! The completion is expected to follow the quiz prompt template:
//!
//! ```text
//! **1. Question?**
//! - a) ...
//! - b) ...
//! - c) ...
//! - d) ...
//! **Answer: a**
//! ```
//!
//! Parsing happens in three steps:
//!
//! 1. [`segment`] splits the text into blocks, one per numbered item.
//! 2. Every trimmed line of a block is tagged by [`classify`].
//! 3. A three-state recognizer (seeking question, seeking options, seeking
//!    answer) walks the tagged lines and either builds a question or reports a
//!    [`DiscardReason`].
//!
//! A bad block never aborts the others. [`parse`] fails only when no block
//! survives.

use std::fmt;

use crate::error::ParseError;
use crate::model::{OptionLetter, ParsedQuestion, QuestionDefect};

/// Characters of the completion echoed into the log when nothing parses.
const LOG_PREVIEW_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// What a single trimmed line of a block looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A numbered item such as `1. Text` or `**2. Text**`; holds the text
    /// after the number.
    Numbered(&'a str),
    /// An option line such as `- a) Text` or `B) Text`; holds the trimmed text.
    Option(OptionLetter, &'a str),
    /// A line carrying an answer marker (`**Answer:` anywhere, or a leading
    /// `Answer:`).
    AnswerMarker,
    /// Anything else.
    Text,
}

/// Classify a line. Numbered items win over options, options over answer
/// markers. Recognition still reads the answer from any line carrying a
/// marker.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = numbered_rest(line) {
        return LineKind::Numbered(rest.trim_start());
    }
    if let Some((letter, text)) = option_line(line) {
        return LineKind::Option(letter, text);
    }
    if carries_answer_marker(line) {
        return LineKind::AnswerMarker;
    }
    LineKind::Text
}

/// Whether a line holds an answer marker, whatever else it looks like.
fn carries_answer_marker(line: &str) -> bool {
    line.contains("**Answer:") || line.trim_start().starts_with("Answer:")
}

/// Text after an `[ws][*...]digits.` prefix, untrimmed.
fn numbered_rest(line: &str) -> Option<&str> {
    let rest = line.trim_start().trim_start_matches('*');
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    rest[digits..].strip_prefix('.')
}

/// Whether a raw line opens a new block: a numbered prefix followed by
/// whitespace or the end of the line. `2.5 is larger` does not qualify.
fn opens_item(line: &str) -> bool {
    numbered_rest(line).is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn option_line(line: &str) -> Option<(OptionLetter, &str)> {
    let rest = line.strip_prefix('-').unwrap_or(line).trim_start();
    let mut chars = rest.chars();
    let letter = OptionLetter::from_char(chars.next()?)?;
    let text = chars.as_str().strip_prefix(')')?;
    Some((letter, text.trim()))
}

/// Extract the answer letter from an answer-marker line.
///
/// Looks for an `Answer:` token (any case, at a word boundary, optionally
/// bolded) followed by optional whitespace and a single letter `a`-`d`. The
/// letter must be followed by `**`, whitespace or the end of the line, so
/// `Answer: c)` and `Answer: cat` are rejected.
pub fn answer_letter(line: &str) -> Option<OptionLetter> {
    const TOKEN: &str = "answer:";

    // ASCII lowercasing keeps byte offsets aligned with `line`.
    let lower = line.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(TOKEN) {
        let start = from + pos;
        from = start + TOKEN.len();

        let at_boundary = line[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        if !at_boundary {
            continue;
        }

        let mut chars = line[from..].trim_start().chars();
        let Some(letter) = chars.next().and_then(OptionLetter::from_char) else {
            continue;
        };
        let tail = chars.as_str();
        if tail.is_empty() || tail.starts_with(char::is_whitespace) || tail.starts_with("**") {
            return Some(letter);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// A contiguous run of completion lines presumed to hold one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Position of the block in the completion.
    pub index: usize,
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    /// Trimmed, non-blank lines.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().map(|&l| l.trim()).filter(|l| !l.is_empty())
    }

    /// Whether the first non-blank line is a numbered item.
    pub fn opens_with_item(&self) -> bool {
        self.lines()
            .next()
            .is_some_and(|l| numbered_rest(l).is_some())
    }

    /// The block as it appeared in the completion.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Split a completion into blocks.
///
/// A new block starts at every line (other than the very first) that opens a
/// numbered item. Blank lines and separators such as `---` stay with the block
/// before them, so every block after the first starts with a numbered line.
pub fn segment(raw: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (i, line) in raw.split('\n').enumerate() {
        if i > 0 && opens_item(line) {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    blocks.push(current);

    blocks
        .into_iter()
        .enumerate()
        .map(|(index, lines)| Block { index, lines })
        .collect()
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// Why a block was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Introductory prose before the first numbered item.
    Preamble,
    /// No numbered line was found.
    NoQuestionStart,
    /// No option line follows the question.
    NoOptionSection,
    /// The question text is empty once emphasis is removed.
    EmptyQuestion,
    /// An option slot was never filled.
    MissingOption(OptionLetter),
    /// No line carries an answer marker.
    NoAnswerMarker,
    /// The answer marker does not name a letter `a`-`d`.
    UnreadableAnswer,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::Preamble => write!(f, "introductory text"),
            DiscardReason::NoQuestionStart => write!(f, "no numbered question line"),
            DiscardReason::NoOptionSection => write!(f, "no option lines after the question"),
            DiscardReason::EmptyQuestion => write!(f, "question text is empty"),
            DiscardReason::MissingOption(letter) => write!(f, "option {letter}) is missing"),
            DiscardReason::NoAnswerMarker => write!(f, "no answer line"),
            DiscardReason::UnreadableAnswer => write!(f, "answer line has no letter a-d"),
        }
    }
}

impl From<QuestionDefect> for DiscardReason {
    fn from(defect: QuestionDefect) -> Self {
        match defect {
            QuestionDefect::EmptyQuestion => DiscardReason::EmptyQuestion,
            QuestionDefect::MissingOption(letter) => DiscardReason::MissingOption(letter),
        }
    }
}

/// A dropped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discard {
    pub index: usize,
    pub reason: DiscardReason,
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: {}", self.index, self.reason)
    }
}

/// Result of recognizing one block.
pub type BlockOutcome = Result<ParsedQuestion, Discard>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingQuestion,
    SeekingOptions,
    SeekingAnswer,
}

fn recognize(block: &Block<'_>) -> Result<ParsedQuestion, DiscardReason> {
    let mut state = State::SeekingQuestion;
    let mut stem: Vec<&str> = Vec::new();
    let mut options: [&str; 4] = [""; 4];
    let mut answer_line: Option<&str> = None;

    for line in block.lines() {
        let kind = classify(line);

        match (state, kind) {
            (State::SeekingQuestion, LineKind::Numbered(rest)) => {
                stem.push(rest);
                state = State::SeekingOptions;
            }
            (State::SeekingOptions, LineKind::Option(..)) => state = State::SeekingAnswer,
            (State::SeekingOptions, _) => stem.push(line),
            _ => {}
        }

        if let LineKind::Option(letter, text) = kind {
            options[letter.index()] = text;
        }
        // An option line may carry the answer too, as in `- d) Rome **Answer: c**`.
        if answer_line.is_none() && carries_answer_marker(line) {
            answer_line = Some(line);
        }
    }

    match state {
        State::SeekingQuestion => return Err(DiscardReason::NoQuestionStart),
        State::SeekingOptions => return Err(DiscardReason::NoOptionSection),
        State::SeekingAnswer => {}
    }

    let answer = answer_letter(answer_line.ok_or(DiscardReason::NoAnswerMarker)?)
        .ok_or(DiscardReason::UnreadableAnswer)?;

    let question = strip_emphasis(&stem);
    let question = ParsedQuestion::new(question, options.map(str::to_string), answer)?;
    Ok(question)
}

/// Remove `*` emphasis and blank lines from the stem, keeping line breaks.
fn strip_emphasis(stem: &[&str]) -> String {
    stem.iter()
        .map(|line| line.replace('*', ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Questions recovered from one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuiz {
    /// Valid questions, in completion order.
    pub questions: Vec<ParsedQuestion>,
    /// Blocks that were dropped.
    pub discarded: Vec<Discard>,
    /// How many questions were asked for.
    pub requested: usize,
}

impl ParsedQuiz {
    /// Fewer questions than requested survived.
    pub fn is_short(&self) -> bool {
        self.questions.len() < self.requested
    }
}

/// Recognize every block of a completion independently.
pub fn parse_blocks(raw: &str) -> Vec<BlockOutcome> {
    segment(raw)
        .iter()
        .map(|block| {
            let outcome = if block.index == 0 && !block.opens_with_item() {
                Err(DiscardReason::Preamble)
            } else {
                recognize(block)
            };

            match outcome {
                Ok(question) => {
                    tracing::debug!(block = block.index, "parsed question: {}", question.question());
                    Ok(question)
                }
                Err(DiscardReason::Preamble) => {
                    tracing::debug!("skipping introductory text before the first question");
                    Err(Discard {
                        index: block.index,
                        reason: DiscardReason::Preamble,
                    })
                }
                Err(reason) => {
                    tracing::warn!(block = block.index, "dropping block: {reason}");
                    tracing::debug!(block = block.index, "dropped block content:\n{}", block.text());
                    Err(Discard {
                        index: block.index,
                        reason,
                    })
                }
            }
        })
        .collect()
}

/// Parse a completion into questions.
///
/// `requested` is advisory: a shorter result is still a success. Fails with
/// [`ParseError::EmptyResult`] when no block yields a valid question.
pub fn parse(raw: &str, requested: usize) -> Result<ParsedQuiz, ParseError> {
    let outcomes = parse_blocks(raw);
    let blocks = outcomes.len();

    let mut questions = Vec::new();
    let mut discarded = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(question) => questions.push(question),
            Err(discard) => discarded.push(discard),
        }
    }

    if questions.is_empty() {
        let preview: String = raw.chars().take(LOG_PREVIEW_CHARS).collect();
        tracing::error!(blocks, "no questions parsed from completion: {preview}");
        return Err(ParseError::EmptyResult { blocks, discarded });
    }

    let quiz = ParsedQuiz {
        questions,
        discarded,
        requested,
    };
    if quiz.is_short() {
        tracing::info!(
            "parsed {} of {} requested questions",
            quiz.questions.len(),
            requested
        );
    }
    Ok(quiz)
}
