use std::sync::Arc;

use campus_core::model::{AnswerValue, OptionId, QuestionId, SubmissionKind};
use campus_core::time::{fixed_clock, fixed_now};
use services::sessions::{ManualTicker, SessionRunner};
use storage::fixtures::{ids, seed_demo};
use storage::repository::Storage;

async fn runner_over_seeded_storage() -> (SessionRunner, ManualTicker, Storage) {
    let storage = Storage::in_memory();
    seed_demo(&storage, fixed_now()).await.unwrap();
    let ticker = ManualTicker::new();
    let runner = SessionRunner::new(
        fixed_clock(),
        Arc::clone(&storage.assessments),
        Arc::clone(&storage.attempts),
        Arc::new(ticker.clone()),
    );
    (runner, ticker, storage)
}

#[tokio::test]
async fn full_exam_flow_with_expiry() {
    let (mut runner, ticker, storage) = runner_over_seeded_storage().await;

    runner
        .begin(ids::EXAM_HTML_CSS, ids::STUDENT_ANA)
        .await
        .unwrap();

    let snapshot = runner.snapshot().unwrap();
    assert_eq!(snapshot.total_questions, 3);
    assert_eq!(snapshot.remaining_secs, 60 * 60);
    assert_eq!(snapshot.remaining_display(), "60:00");

    // Answer the hyperlink question, skip ahead, answer true/false.
    runner
        .answer_current(AnswerValue::choice(OptionId::new(10111)))
        .unwrap();
    runner.go_next().unwrap();
    runner
        .answer_current(AnswerValue::choice(OptionId::new(10121)))
        .unwrap();

    // Revise the first answer through the navigation grid.
    runner.jump_to(0).unwrap();
    runner
        .answer_current(AnswerValue::choice(OptionId::new(10112)))
        .unwrap();

    // Let the whole hour run out.
    ticker.fire_many(60 * 60);

    let snapshot = runner.snapshot().unwrap();
    assert!(snapshot.is_submitted);
    assert_eq!(snapshot.answered, 2);

    let attempt = runner.submit().await.unwrap().expect("collected attempt");
    assert_eq!(attempt.submission(), SubmissionKind::TimerExpired);
    assert_eq!(
        attempt.answer_for(QuestionId::new(1011)),
        Some(&AnswerValue::choice(OptionId::new(10112))),
        "the revised answer is the one that sticks"
    );
    assert_eq!(attempt.answer_for(QuestionId::new(1013)), None);

    let stored = storage
        .attempts
        .list_attempts(ids::EXAM_HTML_CSS, ids::STUDENT_ANA)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), attempt.id());
}

#[tokio::test]
async fn manual_finish_before_the_clock() {
    let (mut runner, ticker, storage) = runner_over_seeded_storage().await;

    runner
        .begin(ids::QUIZ_REACT, ids::STUDENT_JORGE)
        .await
        .unwrap();
    runner
        .answer_current(AnswerValue::text(
            "Functions that let components hold state.",
        ))
        .unwrap();
    runner.go_next().unwrap();
    runner
        .answer_current(AnswerValue::choice(OptionId::new(20124)))
        .unwrap();

    ticker.fire_many(30);
    let attempt = runner.submit().await.unwrap().expect("attempt");
    assert_eq!(attempt.submission(), SubmissionKind::Manual);
    assert_eq!(attempt.answered_count(), 2);

    // Ticks arriving after the handoff hit nothing.
    ticker.fire_many(10);
    assert_eq!(ticker.active_count(), 0);

    let stored = storage
        .attempts
        .list_attempts(ids::QUIZ_REACT, ids::STUDENT_JORGE)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn two_attempts_accumulate_in_storage() {
    let (mut runner, _ticker, storage) = runner_over_seeded_storage().await;

    for _ in 0..2 {
        runner
            .begin(ids::EXAM_HTML_CSS, ids::STUDENT_ANA)
            .await
            .unwrap();
        runner
            .answer_current(AnswerValue::choice(OptionId::new(10111)))
            .unwrap();
        runner.submit().await.unwrap();
    }

    let stored = storage
        .attempts
        .list_attempts(ids::EXAM_HTML_CSS, ids::STUDENT_ANA)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id(), stored[1].id());
}
