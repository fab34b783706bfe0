//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankName, ParseBankNameError};
use storage::repository::StorageError;

/// Errors emitted by `BankSelector`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SelectorError {
    #[error(transparent)]
    UnknownBank(#[from] ParseBankNameError),
    #[error("question bank {0} is not loaded")]
    NotLoaded(BankName),
    #[error("bank selector lock poisoned")]
    Poisoned,
}

/// Errors emitted while grading and recording a submission.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
