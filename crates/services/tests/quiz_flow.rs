use quiz_core::model::{BankName, ChapterKey, QuestionId, SessionId, SubmittedAnswer, Verdict};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{AppServices, Submission};
use storage::bank_file::parse_bank;

const EASY: &str = r#"{
  "meta": {
    "course": "INB 300 - International Business",
    "chapters": { "1": "Globalization", "2": "Culture" }
  },
  "questions": [
    { "id": "Q1", "ch": "2", "type": "MCQ", "q": "Which?", "opts": ["X", "Y"], "ans": "B", "exp": "Y it is." },
    { "id": "Q2", "ch": "2", "type": "TF", "q": "Culture is static.", "ans": "False", "exp": "" },
    { "id": "Q3", "ch": "1", "type": "TF", "q": "Trade grows.", "ans": "True", "exp": "" }
  ]
}"#;

const HARD: &str = r#"{
  "meta": {
    "course": "INB 300 - International Business",
    "edition": "Hard Edition",
    "chapters": { "3": "Politics" }
  },
  "questions": [
    { "id": "H1", "ch": "3", "type": "MCQ", "q": "Hard one?", "opts": ["A1", "B1", "C1"], "ans": "C", "exp": "" }
  ]
}"#;

fn services() -> AppServices {
    let easy = parse_bank(EASY).expect("easy bank");
    let hard = parse_bank(HARD).expect("hard bank");
    AppServices::new(
        [(BankName::Easy, easy), (BankName::Hard, hard)],
        BankName::Easy,
        fixed_clock(),
    )
    .expect("build services")
}

fn answer(id: &str, value: &str) -> SubmittedAnswer {
    SubmittedAnswer::new(QuestionId::new(id), value)
}

#[tokio::test]
async fn single_correct_answer_updates_chapter_two() {
    let app = services();

    let record = app
        .grading()
        .submit(
            Submission::new(vec![answer("Q1", "B")])
                .with_session_id(SessionId::new("session_one"))
                .with_chapter(ChapterKey::new("2")),
        )
        .await
        .expect("submit");

    assert_eq!(record.score_percent(), 100);
    assert_eq!(record.correct_answers(), 1);
    assert_eq!(record.total_questions(), 1);
    assert_eq!(record.timestamp(), fixed_now());
    assert_eq!(record.results()[0].verdict, Verdict::Correct);
    assert_eq!(record.results()[0].correct_value.as_deref(), Some("B"));

    let stats = app
        .statistics()
        .current_statistics()
        .await
        .expect("statistics");
    assert_eq!(stats.total_questions(), 1);
    assert_eq!(stats.correct_answers(), 1);
    let chapter_two = stats.chapter(&ChapterKey::new("2")).expect("chapter 2");
    assert_eq!((chapter_two.attempted, chapter_two.correct), (1, 1));
    let chapter_one = stats.chapter(&ChapterKey::new("1")).expect("chapter 1");
    assert_eq!((chapter_one.attempted, chapter_one.correct), (0, 0));
}

#[tokio::test]
async fn chapters_from_both_banks_are_tracked() {
    let app = services();
    let stats = app
        .statistics()
        .current_statistics()
        .await
        .expect("statistics");
    let keys: Vec<_> = stats.chapters().keys().map(ChapterKey::as_str).collect();
    assert_eq!(keys, ["1", "2", "3"]);
}

#[tokio::test]
async fn switching_banks_changes_grading_and_selection() {
    let app = services();

    let switch = app.selector().switch_to("hard");
    assert!(switch.success);
    assert_eq!(app.selection().all_questions().expect("questions").len(), 1);

    // Easy ids are unknown to the hard bank.
    let record = app
        .grading()
        .submit(Submission::new(vec![answer("Q1", "B"), answer("H1", "C")]))
        .await
        .expect("submit");
    assert_eq!(record.bank(), BankName::Hard);
    assert_eq!(record.total_questions(), 1);
    assert_eq!(record.correct_answers(), 1);
    assert_eq!(record.results()[0].verdict, Verdict::NotFound);

    let rejected = app.selector().switch_to("impossible");
    assert!(!rejected.success);
    assert_eq!(
        app.selector().current().expect("current").difficulty,
        BankName::Hard
    );
}

#[tokio::test]
async fn session_log_returns_newest_first() {
    let app = services();
    let grading = app.grading();

    for i in 0..5 {
        grading
            .submit(
                Submission::new(vec![answer("Q3", "True")])
                    .with_session_id(SessionId::new(format!("session_{i}"))),
            )
            .await
            .expect("submit");
    }

    let recent = app.sessions().recent(Some(2)).await.expect("recent");
    let ids: Vec<_> = recent.iter().map(|r| r.session_id().as_str()).collect();
    assert_eq!(ids, ["session_4", "session_3"]);

    let stats = app
        .statistics()
        .current_statistics()
        .await
        .expect("statistics");
    assert_eq!(stats.total_questions(), 5);
    assert_eq!(stats.chapter(&ChapterKey::new("1")).expect("chapter 1").attempted, 0);
}

#[tokio::test]
async fn presentation_follows_active_bank() {
    let app = services();
    let cards = app.presentation().flashcards(None).expect("flashcards");
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0].back.answer, "Y");

    app.selector().switch_to("hard");
    let pairs = app.presentation().matching_pairs(None).expect("pairs");
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].definition, "No definition available");
}
