use quiz_core::model::{ChapterKey, SessionId, SubmittedAnswer};

/// A client's answers for one quiz session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Client-generated id; a fresh one is assigned when absent.
    pub session_id: Option<SessionId>,
    pub chapter: Option<ChapterKey>,
    pub time_spent_secs: Option<u32>,
    pub answers: Vec<SubmittedAnswer>,
}

impl Submission {
    #[must_use]
    pub fn new(answers: Vec<SubmittedAnswer>) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    #[must_use]
    pub fn with_chapter(mut self, chapter: ChapterKey) -> Self {
        self.chapter = Some(chapter);
        self
    }

    #[must_use]
    pub fn with_time_spent(mut self, secs: u32) -> Self {
        self.time_spent_secs = Some(secs);
        self
    }
}
