use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterKey, QuestionId};
use crate::model::question::{Question, QuestionType};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("course name cannot be empty")]
    EmptyCourse,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(QuestionId),
}

//
// ─── BANK NAME ─────────────────────────────────────────────────────────────────
//

/// Name of a selectable question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankName {
    #[default]
    Easy,
    Hard,
}

impl BankName {
    pub const ALL: [BankName; 2] = [BankName::Easy, BankName::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BankName::Easy => "easy",
            BankName::Hard => "hard",
        }
    }
}

impl fmt::Display for BankName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown question bank: {raw:?}")]
pub struct ParseBankNameError {
    pub raw: String,
}

impl FromStr for BankName {
    type Err = ParseBankNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseBankNameError { raw: s.to_owned() }),
        }
    }
}

//
// ─── META ──────────────────────────────────────────────────────────────────────
//

/// Course-level metadata shipped with a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankMeta {
    course: String,
    edition: Option<String>,
    chapters: BTreeMap<ChapterKey, String>,
}

impl BankMeta {
    /// Creates bank metadata.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyCourse` if the course name is blank.
    pub fn new(
        course: impl Into<String>,
        edition: Option<String>,
        chapters: BTreeMap<ChapterKey, String>,
    ) -> Result<Self, BankError> {
        let course = course.into();
        if course.trim().is_empty() {
            return Err(BankError::EmptyCourse);
        }
        let edition = edition
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());
        Ok(Self {
            course: course.trim().to_owned(),
            edition,
            chapters,
        })
    }

    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    #[must_use]
    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    #[must_use]
    pub fn chapters(&self) -> &BTreeMap<ChapterKey, String> {
        &self.chapters
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Immutable question collection with an id index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    meta: BankMeta,
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    /// Creates a bank, keeping the questions in the given order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateQuestionId` if two questions share an id.
    pub fn new(meta: BankMeta, questions: Vec<Question>) -> Result<Self, BankError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (pos, question) in questions.iter().enumerate() {
            if index.insert(question.id().clone(), pos).is_some() {
                return Err(BankError::DuplicateQuestionId(question.id().clone()));
            }
        }
        Ok(Self {
            meta,
            questions,
            index,
        })
    }

    #[must_use]
    pub fn meta(&self) -> &BankMeta {
        &self.meta
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|pos| &self.questions[*pos])
    }

    pub fn in_chapter<'a>(&'a self, chapter: &'a ChapterKey) -> impl Iterator<Item = &'a Question> {
        self.questions.iter().filter(move |q| q.chapter() == chapter)
    }

    pub fn of_type(&self, kind: QuestionType) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.question_type() == kind)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
