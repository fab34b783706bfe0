mod grading;
mod history;
mod submission;

// Public API of the session subsystem.
pub use crate::error::SubmissionError;
pub use grading::GradingService;
pub use history::{DEFAULT_RECENT_LIMIT, SessionLogService};
pub use submission::Submission;
