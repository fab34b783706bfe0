use std::sync::Arc;

use quiz_core::model::{BankName, QuestionBank};
use storage::repository::Storage;

use crate::Clock;
use crate::bank_selector::BankSelector;
use crate::error::AppServicesError;
use crate::presentation_service::PresentationService;
use crate::selection_service::SelectionService;
use crate::sessions::{GradingService, SessionLogService};
use crate::statistics_service::StatisticsService;

/// Assembles the quiz services over a shared bank selector and storage.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    selector: Arc<BankSelector>,
    selection: Arc<SelectionService>,
    grading: Arc<GradingService>,
    statistics: Arc<StatisticsService>,
    sessions: Arc<SessionLogService>,
    presentation: Arc<PresentationService>,
}

impl AppServices {
    /// Build services backed by in-memory storage.
    ///
    /// Statistics track the union of the chapters declared by every loaded
    /// bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if `initial` is not among `banks`.
    pub fn new(
        banks: impl IntoIterator<Item = (BankName, QuestionBank)>,
        initial: BankName,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let selector = Arc::new(BankSelector::new(banks, initial)?);
        let storage = Storage::in_memory(selector.chapter_keys());
        Ok(Self::from_parts(selector, &storage, clock))
    }

    /// Build services over an existing selector and storage.
    #[must_use]
    pub fn from_parts(selector: Arc<BankSelector>, storage: &Storage, clock: Clock) -> Self {
        let statistics = Arc::new(StatisticsService::new(Arc::clone(&storage.statistics)));
        let sessions = Arc::new(SessionLogService::new(Arc::clone(&storage.sessions)));
        let grading = Arc::new(GradingService::new(
            clock,
            Arc::clone(&selector),
            Arc::clone(&statistics),
            Arc::clone(&sessions),
        ));
        let selection = Arc::new(SelectionService::new(Arc::clone(&selector)));
        let presentation = Arc::new(PresentationService::new(Arc::clone(&selector)));

        Self {
            clock,
            selector,
            selection,
            grading,
            statistics,
            sessions,
            presentation,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn selector(&self) -> Arc<BankSelector> {
        Arc::clone(&self.selector)
    }

    #[must_use]
    pub fn selection(&self) -> Arc<SelectionService> {
        Arc::clone(&self.selection)
    }

    #[must_use]
    pub fn grading(&self) -> Arc<GradingService> {
        Arc::clone(&self.grading)
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionLogService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn presentation(&self) -> Arc<PresentationService> {
        Arc::clone(&self.presentation)
    }
}
