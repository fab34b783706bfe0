use std::sync::Arc;

use serde::Serialize;

use quiz_core::model::{ChapterKey, Question, QuestionBank};

use crate::bank_selector::BankSelector;
use crate::error::SelectorError;

/// Number of pairs in one matching round.
pub const MATCHING_PAIR_LIMIT: usize = 8;

const NO_EXPLANATION: &str = "No explanation available";
const NO_DEFINITION: &str = "No definition available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashcardBack {
    pub answer: String,
    pub explanation: String,
}

/// Prompt on the front, answer text and explanation on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub front: String,
    pub back: FlashcardBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchingPair {
    pub term: String,
    pub definition: String,
}

fn filtered<'a>(
    bank: &'a QuestionBank,
    chapter: Option<&'a ChapterKey>,
) -> impl Iterator<Item = &'a Question> {
    bank.questions()
        .iter()
        .filter(move |q| chapter.is_none_or(|key| q.chapter() == key))
}

fn or_placeholder(text: &str, placeholder: &str) -> String {
    if text.is_empty() {
        placeholder.to_owned()
    } else {
        text.to_owned()
    }
}

#[must_use]
pub fn flashcards(bank: &QuestionBank, chapter: Option<&ChapterKey>) -> Vec<Flashcard> {
    filtered(bank, chapter)
        .map(|q| Flashcard {
            front: q.prompt().to_owned(),
            back: FlashcardBack {
                answer: q.correct_answer_text().to_owned(),
                explanation: or_placeholder(q.explanation(), NO_EXPLANATION),
            },
        })
        .collect()
}

/// The first [`MATCHING_PAIR_LIMIT`] questions as term/definition pairs.
#[must_use]
pub fn matching_pairs(bank: &QuestionBank, chapter: Option<&ChapterKey>) -> Vec<MatchingPair> {
    filtered(bank, chapter)
        .take(MATCHING_PAIR_LIMIT)
        .map(|q| MatchingPair {
            term: q.prompt().to_owned(),
            definition: or_placeholder(q.explanation(), NO_DEFINITION),
        })
        .collect()
}

/// Study-mode projections of the active bank.
#[derive(Clone)]
pub struct PresentationService {
    selector: Arc<BankSelector>,
}

impl PresentationService {
    #[must_use]
    pub fn new(selector: Arc<BankSelector>) -> Self {
        Self { selector }
    }

    /// # Errors
    ///
    /// Returns `SelectorError` if the active bank cannot be resolved.
    pub fn flashcards(&self, chapter: Option<&ChapterKey>) -> Result<Vec<Flashcard>, SelectorError> {
        let (_, bank) = self.selector.active_bank()?;
        Ok(flashcards(&bank, chapter))
    }

    /// # Errors
    ///
    /// Returns `SelectorError` if the active bank cannot be resolved.
    pub fn matching_pairs(
        &self,
        chapter: Option<&ChapterKey>,
    ) -> Result<Vec<MatchingPair>, SelectorError> {
        let (_, bank) = self.selector.active_bank()?;
        Ok(matching_pairs(&bank, chapter))
    }
}
