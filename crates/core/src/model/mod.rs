mod bank;
mod grading;
mod ids;
mod question;
mod session;
mod statistics;

pub use bank::{BankError, BankMeta, BankName, ParseBankNameError, QuestionBank};
pub use grading::{GradedAnswer, GradingResult, SubmittedAnswer, Verdict, grade, score_percent};
pub use ids::{ChapterKey, QuestionId, SessionId};
pub use question::{Question, QuestionError, QuestionKind, QuestionType, letter_index, option_letter};
pub use session::SessionRecord;
pub use statistics::{ChapterStats, StatisticsError, StatisticsState};
