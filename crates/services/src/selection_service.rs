use std::sync::Arc;

use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{ChapterKey, Question, QuestionBank, QuestionType};

use crate::bank_selector::BankSelector;
use crate::error::SelectorError;

/// Sample size used when the requested count is missing or unusable.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Parse a requested sample size. Absent, non-numeric and non-positive
/// values fall back to [`DEFAULT_SAMPLE_SIZE`].
#[must_use]
pub fn parse_sample_size(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|count| *count > 0)
        .and_then(|count| usize::try_from(count).ok())
        .unwrap_or(DEFAULT_SAMPLE_SIZE)
}

//
// ─── PURE SELECTIONS ───────────────────────────────────────────────────────────
//

#[must_use]
pub fn all_questions(bank: &QuestionBank) -> Vec<Question> {
    bank.questions().to_vec()
}

#[must_use]
pub fn by_chapter(bank: &QuestionBank, chapter: &ChapterKey) -> Vec<Question> {
    bank.in_chapter(chapter).cloned().collect()
}

/// Questions whose type tag matches `raw_type`, ignoring case. Unknown tags
/// match nothing.
#[must_use]
pub fn by_type(bank: &QuestionBank, raw_type: &str) -> Vec<Question> {
    match QuestionType::parse_tag(raw_type) {
        Some(kind) => bank.of_type(kind).cloned().collect(),
        None => Vec::new(),
    }
}

/// Shuffle the bank and keep the first `count` questions.
pub fn random_sample_with<R: Rng + ?Sized>(
    bank: &QuestionBank,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut questions = bank.questions().to_vec();
    questions.shuffle(rng);
    questions.truncate(count);
    questions
}

#[must_use]
pub fn random_sample(bank: &QuestionBank, count: usize) -> Vec<Question> {
    random_sample_with(bank, count, &mut rng())
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Read-only question queries against whichever bank is active.
#[derive(Clone)]
pub struct SelectionService {
    selector: Arc<BankSelector>,
}

impl SelectionService {
    #[must_use]
    pub fn new(selector: Arc<BankSelector>) -> Self {
        Self { selector }
    }

    /// Active bank, resolved per call.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError` if the selector lock is poisoned.
    pub fn active_bank(&self) -> Result<Arc<QuestionBank>, SelectorError> {
        self.selector.active_bank().map(|(_, bank)| bank)
    }

    /// # Errors
    ///
    /// Returns `SelectorError` if the selector lock is poisoned.
    pub fn all_questions(&self) -> Result<Vec<Question>, SelectorError> {
        let bank = self.active_bank()?;
        Ok(all_questions(&bank))
    }

    /// # Errors
    ///
    /// Returns `SelectorError` if the selector lock is poisoned.
    pub fn by_chapter(&self, chapter: &ChapterKey) -> Result<Vec<Question>, SelectorError> {
        let bank = self.active_bank()?;
        Ok(by_chapter(&bank, chapter))
    }

    /// # Errors
    ///
    /// Returns `SelectorError` if the selector lock is poisoned.
    pub fn by_type(&self, raw_type: &str) -> Result<Vec<Question>, SelectorError> {
        let bank = self.active_bank()?;
        Ok(by_type(&bank, raw_type))
    }

    /// Random questions; `raw_count` is parsed with [`parse_sample_size`].
    ///
    /// # Errors
    ///
    /// Returns `SelectorError` if the selector lock is poisoned.
    pub fn random_sample(&self, raw_count: Option<&str>) -> Result<Vec<Question>, SelectorError> {
        let count = parse_sample_size(raw_count);
        let bank = self.active_bank()?;
        Ok(random_sample(&bank, count))
    }
}
