use crate::model::bank::QuestionBank;
use crate::model::ids::QuestionId;

/// One answer as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub chosen_value: String,
}

impl SubmittedAnswer {
    #[must_use]
    pub fn new(question_id: QuestionId, chosen_value: impl Into<String>) -> Self {
        Self {
            question_id,
            chosen_value: chosen_value.into(),
        }
    }
}

/// Outcome of grading a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The question id is not in the bank the answer was graded against.
    /// Such answers are reported but do not count towards the score.
    NotFound,
}

impl Verdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
            Verdict::NotFound => "not_found",
        }
    }
}

/// Per-answer grading detail echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: QuestionId,
    pub prompt: Option<String>,
    pub chosen_value: String,
    pub correct_value: Option<String>,
    pub explanation: Option<String>,
    pub verdict: Verdict,
}

impl GradedAnswer {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

/// Aggregate result of one grading pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingResult {
    pub score_percent: u32,
    pub correct_count: u32,
    pub total_count: u32,
    pub results: Vec<GradedAnswer>,
}

impl GradingResult {
    /// Answers whose question id was not found in the bank.
    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict == Verdict::NotFound)
            .count()
    }
}

/// Rounded percentage of `correct` over `total`; 0 when `total` is 0.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer round-half-up of correct * 100 / total.
    let scaled = u64::from(correct) * 200 + u64::from(total);
    let pct = scaled / (u64::from(total) * 2);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Grade `answers` against `bank`.
///
/// Unknown question ids get a [`Verdict::NotFound`] entry and grading carries
/// on with the remaining answers.
#[must_use]
pub fn grade(bank: &QuestionBank, answers: &[SubmittedAnswer]) -> GradingResult {
    let mut correct_count = 0_u32;
    let mut total_count = 0_u32;
    let mut results = Vec::with_capacity(answers.len());

    for answer in answers {
        let Some(question) = bank.find(&answer.question_id) else {
            results.push(GradedAnswer {
                question_id: answer.question_id.clone(),
                prompt: None,
                chosen_value: answer.chosen_value.clone(),
                correct_value: None,
                explanation: None,
                verdict: Verdict::NotFound,
            });
            continue;
        };

        total_count = total_count.saturating_add(1);
        let verdict = if question.is_correct(&answer.chosen_value) {
            correct_count = correct_count.saturating_add(1);
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };

        results.push(GradedAnswer {
            question_id: answer.question_id.clone(),
            prompt: Some(question.prompt().to_owned()),
            chosen_value: answer.chosen_value.clone(),
            correct_value: Some(question.correct_answer()),
            explanation: Some(question.explanation().to_owned()),
            verdict,
        });
    }

    GradingResult {
        score_percent: score_percent(correct_count, total_count),
        correct_count,
        total_count,
        results,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{BankMeta, ChapterKey, Question};

    fn single_mcq_bank() -> QuestionBank {
        let meta = BankMeta::new("Test course", None, BTreeMap::new()).unwrap();
        let q1 = Question::multiple_choice(
            QuestionId::new("Q1"),
            ChapterKey::new("1"),
            "Pick the second",
            vec!["X".into(), "Y".into()],
            "B",
            "Y is second.",
        )
        .unwrap();
        QuestionBank::new(meta, vec![q1]).unwrap()
    }

    #[test]
    fn score_percent_rounds_and_guards_zero() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(5, 5), 100);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let result = grade(&single_mcq_bank(), &[]);
        assert_eq!(result.score_percent, 0);
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.total_count, 0);
        assert!(result.results.is_empty());
    }

    #[test]
    fn correct_letter_scores_full_marks() {
        let bank = single_mcq_bank();
        let result = grade(&bank, &[SubmittedAnswer::new(QuestionId::new("Q1"), "B")]);
        assert_eq!(result.score_percent, 100);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.total_count, 1);

        let detail = &result.results[0];
        assert!(detail.is_correct());
        assert_eq!(detail.prompt.as_deref(), Some("Pick the second"));
        assert_eq!(detail.correct_value.as_deref(), Some("B"));
        assert_eq!(detail.explanation.as_deref(), Some("Y is second."));
    }

    #[test]
    fn wrong_letter_scores_zero() {
        let bank = single_mcq_bank();
        let result = grade(&bank, &[SubmittedAnswer::new(QuestionId::new("Q1"), "A")]);
        assert_eq!(result.score_percent, 0);
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.results[0].verdict, Verdict::Incorrect);
    }

    #[test]
    fn unknown_ids_are_marked_and_skipped() {
        let bank = single_mcq_bank();
        let result = grade(
            &bank,
            &[
                SubmittedAnswer::new(QuestionId::new("missing"), "A"),
                SubmittedAnswer::new(QuestionId::new("Q1"), "B"),
            ],
        );
        assert_eq!(result.total_count, 1);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.score_percent, 100);
        assert_eq!(result.not_found_count(), 1);
        assert_eq!(result.results[0].verdict, Verdict::NotFound);
        assert!(result.results[0].correct_value.is_none());
    }
}
