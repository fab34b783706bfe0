#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_selector;
pub mod error;
pub mod presentation_service;
pub mod selection_service;
pub mod sessions;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use bank_selector::{BankSelector, BankSummary, BankSwitch};
pub use error::{AppServicesError, SelectorError, SubmissionError};
pub use presentation_service::{Flashcard, FlashcardBack, MatchingPair, PresentationService};
pub use selection_service::{DEFAULT_SAMPLE_SIZE, SelectionService};
pub use sessions::{DEFAULT_RECENT_LIMIT, GradingService, SessionLogService, Submission};
pub use statistics_service::StatisticsService;
