use std::fmt;

use thiserror::Error;

use crate::model::ids::{ChapterKey, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id}: prompt cannot be empty")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id}: multiple choice needs at least 2 options, got {count}")]
    TooFewOptions { id: QuestionId, count: usize },

    #[error("question {id}: answer {answer:?} is not an option letter")]
    InvalidAnswerLetter { id: QuestionId, answer: String },

    #[error("question {id}: answer {answer:?} is outside the {options} options")]
    AnswerOutOfRange {
        id: QuestionId,
        answer: String,
        options: usize,
    },

    #[error("question {id}: true/false answer must be \"True\" or \"False\", got {answer:?}")]
    InvalidTrueFalse { id: QuestionId, answer: String },

    #[error("question {id}: unknown question type {tag:?}")]
    UnknownType { id: QuestionId, tag: String },
}

//
// ─── OPTION LETTERS ────────────────────────────────────────────────────────────
//

/// Maps an option position to its letter: 0 → `A`, 1 → `B`, ...
#[must_use]
pub fn option_letter(index: usize) -> Option<char> {
    let offset = u8::try_from(index).ok().filter(|i| *i < 26)?;
    Some(char::from(b'A' + offset))
}

/// Maps a single option letter back to its position. Case-sensitive.
#[must_use]
pub fn letter_index(letter: &str) -> Option<usize> {
    let mut chars = letter.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_uppercase() {
        return None;
    }
    Some(usize::from(c as u8 - b'A'))
}

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Discriminant of [`QuestionKind`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
}

impl QuestionType {
    /// Short tag used by question bank files and the HTTP API.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MCQ",
            QuestionType::TrueFalse => "TF",
        }
    }

    /// Parses a type tag, ignoring case. Accepts the short tags and the
    /// snake-case long names.
    #[must_use]
    pub fn parse_tag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mcq" | "multiple_choice" | "multiplechoice" => Some(Self::MultipleChoice),
            "tf" | "true_false" | "truefalse" => Some(Self::TrueFalse),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Answer shape of a question, resolved when the bank is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
    TrueFalse {
        correct: bool,
    },
}

/// A single immutable question from a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    chapter: ChapterKey,
    prompt: String,
    kind: QuestionKind,
    explanation: String,
}

impl Question {
    /// Builds a multiple choice question from its option list and answer letter.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id or prompt is blank, there are fewer
    /// than two options, or the letter does not point into `options`.
    pub fn multiple_choice(
        id: QuestionId,
        chapter: ChapterKey,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer_letter: &str,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = validate_head(&id, prompt.into())?;
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                count: options.len(),
            });
        }
        let answer = answer_letter.trim();
        let correct_index = letter_index(answer).ok_or_else(|| QuestionError::InvalidAnswerLetter {
            id: id.clone(),
            answer: answer.to_owned(),
        })?;
        if correct_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                id,
                answer: answer.to_owned(),
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            chapter,
            prompt,
            kind: QuestionKind::MultipleChoice {
                options,
                correct_index,
            },
            explanation: explanation.into().trim().to_owned(),
        })
    }

    /// Builds a true/false question. The answer is matched ignoring case and
    /// stored in canonical `"True"`/`"False"` form.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id or prompt is blank or the answer is
    /// not a boolean literal.
    pub fn true_false(
        id: QuestionId,
        chapter: ChapterKey,
        prompt: impl Into<String>,
        answer: &str,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = validate_head(&id, prompt.into())?;
        let correct = match answer.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(QuestionError::InvalidTrueFalse {
                    id,
                    answer: answer.to_owned(),
                });
            }
        };

        Ok(Self {
            id,
            chapter,
            prompt,
            kind: QuestionKind::TrueFalse { correct },
            explanation: explanation.into().trim().to_owned(),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterKey {
        &self.chapter
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
        }
    }

    /// Options for multiple choice questions; empty for true/false.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options,
            QuestionKind::TrueFalse { .. } => &[],
        }
    }

    /// The value a client must submit to be graded correct: the option
    /// letter for multiple choice, `"True"`/`"False"` otherwise.
    #[must_use]
    pub fn correct_answer(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoice { correct_index, .. } => option_letter(*correct_index)
                .map(String::from)
                .unwrap_or_default(),
            QuestionKind::TrueFalse { correct } => bool_literal(*correct).to_owned(),
        }
    }

    /// Human-readable answer: the option text for multiple choice.
    #[must_use]
    pub fn correct_answer_text(&self) -> &str {
        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            } => &options[*correct_index],
            QuestionKind::TrueFalse { correct } => bool_literal(*correct),
        }
    }

    /// Exact comparison against [`Question::correct_answer`].
    #[must_use]
    pub fn is_correct(&self, chosen: &str) -> bool {
        chosen == self.correct_answer()
    }
}

fn validate_head(id: &QuestionId, prompt: String) -> Result<String, QuestionError> {
    if id.as_str().trim().is_empty() {
        return Err(QuestionError::EmptyId);
    }
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(QuestionError::EmptyPrompt { id: id.clone() });
    }
    Ok(prompt.to_owned())
}

fn bool_literal(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn letters_map_both_ways() {
        assert_eq!(option_letter(0), Some('A'));
        assert_eq!(option_letter(3), Some('D'));
        assert_eq!(option_letter(26), None);
        assert_eq!(letter_index("A"), Some(0));
        assert_eq!(letter_index("C"), Some(2));
        assert_eq!(letter_index("c"), None);
        assert_eq!(letter_index("AB"), None);
        assert_eq!(letter_index(""), None);
    }

    #[test]
    fn multiple_choice_happy_path() {
        let q = Question::multiple_choice(
            QuestionId::new("Q1"),
            ChapterKey::new("1"),
            "  What is International Business?  ",
            opts(&["Domestic only", "Across borders", "Exports", "Imports"]),
            "B",
            "Business across national borders.",
        )
        .unwrap();

        assert_eq!(q.prompt(), "What is International Business?");
        assert_eq!(q.question_type(), QuestionType::MultipleChoice);
        assert_eq!(q.correct_answer(), "B");
        assert_eq!(q.correct_answer_text(), "Across borders");
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("b"));
        assert!(!q.is_correct("A"));
    }

    #[test]
    fn multiple_choice_rejects_letter_outside_options() {
        let err = Question::multiple_choice(
            QuestionId::new("Q1"),
            ChapterKey::new("1"),
            "Pick one",
            opts(&["X", "Y"]),
            "C",
            "",
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerOutOfRange {
                id: QuestionId::new("Q1"),
                answer: "C".into(),
                options: 2,
            }
        );
    }

    #[test]
    fn multiple_choice_rejects_non_letter_answer() {
        let err = Question::multiple_choice(
            QuestionId::new("Q1"),
            ChapterKey::new("1"),
            "Pick one",
            opts(&["X", "Y"]),
            "1",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::InvalidAnswerLetter { .. }));
    }

    #[test]
    fn multiple_choice_requires_two_options() {
        let err = Question::multiple_choice(
            QuestionId::new("Q1"),
            ChapterKey::new("1"),
            "Pick one",
            opts(&["only"]),
            "A",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions { count: 1, .. }));
    }

    #[test]
    fn true_false_canonicalizes_answer() {
        let q = Question::true_false(
            QuestionId::new("TF1"),
            ChapterKey::new("2"),
            "Culture is an informal institution.",
            "true",
            "",
        )
        .unwrap();
        assert_eq!(q.correct_answer(), "True");
        assert!(q.is_correct("True"));
        assert!(!q.is_correct("true"));
        assert!(q.options().is_empty());
    }

    #[test]
    fn true_false_rejects_other_literals() {
        let err = Question::true_false(
            QuestionId::new("TF1"),
            ChapterKey::new("2"),
            "Statement",
            "yes",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::InvalidTrueFalse { .. }));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let err = Question::true_false(
            QuestionId::new("TF1"),
            ChapterKey::new("2"),
            "   ",
            "False",
            "",
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::EmptyPrompt {
                id: QuestionId::new("TF1")
            }
        );
    }

    #[test]
    fn type_tags_parse_ignoring_case() {
        assert_eq!(QuestionType::parse_tag("mcq"), Some(QuestionType::MultipleChoice));
        assert_eq!(QuestionType::parse_tag("TF"), Some(QuestionType::TrueFalse));
        assert_eq!(
            QuestionType::parse_tag("True_False"),
            Some(QuestionType::TrueFalse)
        );
        assert_eq!(QuestionType::parse_tag("essay"), None);
        assert_eq!(QuestionType::TrueFalse.to_string(), "TF");
    }
}
