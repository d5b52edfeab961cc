use std::time::Duration;

use quiz_core::model::{OptionIndex, QuestionDraft, QuestionSet, SessionPhase};
use quiz_core::time::fixed_clock;
use quiz_core::{Action, Outcome, QuizSession, Rejection};
use quiz_services::{SessionDriver, SessionError};
use tokio::time::sleep;

fn questions(correct: &[i64]) -> QuestionSet {
    QuestionSet::from_drafts(
        Some("Driver".into()),
        correct
            .iter()
            .enumerate()
            .map(|(idx, c)| QuestionDraft::new(format!("Q{idx}"), ["A", "B", "C", "D"], *c)),
    )
    .unwrap()
}

fn spawn(correct: &[i64]) -> SessionDriver {
    let session = QuizSession::new(questions(correct)).with_clock(fixed_clock());
    SessionDriver::spawn(session, Duration::from_secs(1))
}

#[tokio::test(start_paused = true)]
async fn ticks_are_attributed_to_the_focused_question() {
    let driver = spawn(&[0, 1, 2]);
    driver.start().await.unwrap();

    sleep(Duration::from_millis(3_500)).await;
    assert_eq!(driver.navigate(1).await.unwrap(), 1);
    sleep(Duration::from_millis(1_000)).await;

    let summary = driver.submit().await.unwrap();
    assert_eq!(summary.time_record().get(0), 3);
    assert_eq!(summary.time_record().get(1), 1);
    assert_eq!(summary.time_record().get(2), 0);
    assert_eq!(summary.total_elapsed_secs(), 4);
    assert_eq!(summary.average_secs(), 1);

    sleep(Duration::from_secs(5)).await;
    let snapshot = driver.snapshot().await.unwrap();
    assert_eq!(snapshot.phase(), SessionPhase::Submitted);
    assert_eq!(snapshot.elapsed_secs(), 4);
}

#[tokio::test(start_paused = true)]
async fn no_ticks_before_start_or_after_reset() {
    let driver = spawn(&[0, 1]);
    sleep(Duration::from_secs(3)).await;
    assert_eq!(driver.snapshot().await.unwrap().elapsed_secs(), 0);

    driver.start().await.unwrap();
    sleep(Duration::from_millis(2_500)).await;
    driver.reset().await.unwrap();
    sleep(Duration::from_secs(3)).await;

    let snapshot = driver.snapshot().await.unwrap();
    assert_eq!(snapshot.phase(), SessionPhase::NotStarted);
    assert_eq!(snapshot.elapsed_secs(), 0);
    assert!(snapshot.time_record().is_empty());

    driver.start().await.unwrap();
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(driver.snapshot().await.unwrap().elapsed_secs(), 1);
}

#[tokio::test]
async fn rejections_come_back_through_the_handle() {
    let driver = spawn(&[2, 1]);
    assert_eq!(
        driver.submit().await.unwrap_err(),
        SessionError::Rejected(Rejection::NotStarted)
    );

    driver.start().await.unwrap();
    assert_eq!(
        driver.save_and_next().await.unwrap_err(),
        SessionError::Rejected(Rejection::NoAnswerSelected)
    );

    let option = OptionIndex::new(2).unwrap();
    assert_eq!(
        driver
            .apply(Action::SelectAnswer { question: 0, option })
            .await
            .unwrap(),
        Outcome::Answered { question: 0, option }
    );
    assert_eq!(driver.save_and_next().await.unwrap(), 1);
    driver
        .select_answer(1, OptionIndex::new(0).unwrap())
        .await
        .unwrap();

    let summary = driver.submit().await.unwrap();
    assert!((summary.breakdown().total_score - 1.34).abs() < 1e-9);
    assert_eq!(
        driver.start().await.unwrap_err(),
        SessionError::Rejected(Rejection::AlreadySubmitted)
    );
}

#[tokio::test]
async fn clones_share_one_session() {
    let driver = spawn(&[0, 1, 2]);
    let other = driver.clone();
    assert_eq!(driver.session_id(), other.session_id());

    driver.start().await.unwrap();
    assert_eq!(other.skip().await.unwrap(), 1);
    assert_eq!(driver.previous().await.unwrap(), 0);

    let id = driver
        .with_session(|session| session.id())
        .await
        .unwrap();
    assert_eq!(id, other.session_id());
}
