use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use log::{info, warn};
use serde::Serialize;

use quiz_core::model::{BankName, ChapterKey, QuestionBank};

use crate::error::SelectorError;

/// Summary of the active bank, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSummary {
    pub difficulty: BankName,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
}

/// Outcome of a bank switch request. Failures leave the selection unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSwitch {
    pub success: bool,
    #[serde(flatten)]
    pub current: BankSummary,
    pub message: String,
}

/// Owns the loaded banks and which one is active.
///
/// Readers resolve the active bank on every call; nothing else may hold on
/// to a bank between requests, so a switch applies to the very next read.
#[derive(Debug)]
pub struct BankSelector {
    banks: BTreeMap<BankName, Arc<QuestionBank>>,
    active: RwLock<BankName>,
}

impl BankSelector {
    /// Creates a selector over `banks` starting at `initial`.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::NotLoaded` if `initial` has no bank.
    pub fn new(
        banks: impl IntoIterator<Item = (BankName, QuestionBank)>,
        initial: BankName,
    ) -> Result<Self, SelectorError> {
        let banks: BTreeMap<_, _> = banks
            .into_iter()
            .map(|(name, bank)| (name, Arc::new(bank)))
            .collect();
        if !banks.contains_key(&initial) {
            return Err(SelectorError::NotLoaded(initial));
        }
        Ok(Self {
            banks,
            active: RwLock::new(initial),
        })
    }

    /// Selector over a single easy bank.
    #[must_use]
    pub fn single(bank: QuestionBank) -> Self {
        Self {
            banks: BTreeMap::from([(BankName::Easy, Arc::new(bank))]),
            active: RwLock::new(BankName::Easy),
        }
    }

    /// Name of the active bank.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Poisoned` if a writer panicked.
    pub fn active_name(&self) -> Result<BankName, SelectorError> {
        self.active
            .read()
            .map(|guard| *guard)
            .map_err(|_| SelectorError::Poisoned)
    }

    /// The active bank together with its name.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Poisoned` if a writer panicked.
    pub fn active_bank(&self) -> Result<(BankName, Arc<QuestionBank>), SelectorError> {
        let name = self.active_name()?;
        let bank = self
            .banks
            .get(&name)
            .cloned()
            .ok_or(SelectorError::NotLoaded(name))?;
        Ok((name, bank))
    }

    /// Summary of the active bank.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::Poisoned` if a writer panicked.
    pub fn current(&self) -> Result<BankSummary, SelectorError> {
        let (name, bank) = self.active_bank()?;
        Ok(summarize(name, &bank))
    }

    /// Switch the active bank by name.
    ///
    /// Unknown names and banks that were not loaded fail with
    /// `success = false` and keep the current selection.
    pub fn switch_to(&self, raw_name: &str) -> BankSwitch {
        match self.try_switch(raw_name) {
            Ok(current) => {
                info!(
                    "switched to {} question bank ({} questions)",
                    current.difficulty, current.question_count
                );
                let message = format!("Switched to {} questions", current.difficulty);
                BankSwitch {
                    success: true,
                    current,
                    message,
                }
            }
            Err(err) => {
                warn!("bank switch to {raw_name:?} rejected: {err}");
                let current = self.current().unwrap_or_else(|_| BankSummary {
                    difficulty: BankName::default(),
                    question_count: 0,
                    edition: None,
                });
                BankSwitch {
                    success: false,
                    current,
                    message: err.to_string(),
                }
            }
        }
    }

    fn try_switch(&self, raw_name: &str) -> Result<BankSummary, SelectorError> {
        let name: BankName = raw_name.parse()?;
        let bank = self
            .banks
            .get(&name)
            .ok_or(SelectorError::NotLoaded(name))?;
        let mut guard = self.active.write().map_err(|_| SelectorError::Poisoned)?;
        *guard = name;
        Ok(summarize(name, bank))
    }

    /// Names of all loaded banks.
    pub fn loaded(&self) -> impl Iterator<Item = BankName> + '_ {
        self.banks.keys().copied()
    }

    /// Union of the chapter keys declared by every loaded bank.
    #[must_use]
    pub fn chapter_keys(&self) -> BTreeSet<ChapterKey> {
        self.banks
            .values()
            .flat_map(|bank| bank.meta().chapters().keys().cloned())
            .collect()
    }
}

fn summarize(name: BankName, bank: &QuestionBank) -> BankSummary {
    BankSummary {
        difficulty: name,
        question_count: bank.len(),
        edition: bank.meta().edition().map(str::to_owned),
    }
}
