//! Driver tests on a paused tokio clock, so every timer fires at an exact
//! instant.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_match::{
    start_session, Difficulty, MatchConfig, MatchHandle, Outcome, Phase, Question, SessionError,
};
use tokio::time::{self, Instant};

fn question(id: u32, points: u32, correct_answer: usize) -> Question {
    Question {
        id,
        text: format!("Question {}", id),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer,
        subject: "General".to_string(),
        difficulty: Difficulty::Medium,
        points,
    }
}

fn config(budget_seconds: u32) -> MatchConfig {
    MatchConfig {
        budget_seconds,
        reveal_window_seconds: 2,
        settle_delay_seconds: 3,
        seed: Some(7),
        ..MatchConfig::default()
    }
}

/// Records every outcome the completion callback receives.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl Recorder {
    fn callback(&self) -> impl FnOnce(Outcome) + Send + 'static {
        let recorder = self.clone();
        move |outcome| {
            recorder.calls.fetch_add(1, Ordering::SeqCst);
            recorder.outcomes.lock().unwrap().push(outcome);
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn start(questions: Vec<Question>, config: MatchConfig, recorder: &Recorder) -> MatchHandle {
    start_session(questions, config, recorder.callback()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_empty_question_list_is_rejected() {
    let recorder = Recorder::default();
    let result = start_session(Vec::new(), config(30), recorder.callback());

    assert!(matches!(result, Err(SessionError::InvalidConfiguration(_))));
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_question_times_out_and_completes() {
    let recorder = Recorder::default();
    let started = Instant::now();
    let handle = start(vec![question(1, 100, 0)], config(3), &recorder);

    let outcome = handle.finished().await.unwrap();

    // 3s countdown + 2s reveal + 3s settle.
    assert_eq!(started.elapsed(), Duration::from_secs(8));
    assert_eq!(outcome, Outcome::from_totals(0, 0));
    assert_eq!(recorder.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_correct_then_timeout() {
    let recorder = Recorder::default();
    let handle = start(
        vec![question(1, 100, 2), question(2, 100, 0)],
        config(5),
        &recorder,
    );

    handle.select_answer(2).await.unwrap();
    let revealing = handle.snapshot();
    assert_eq!(revealing.phase, Phase::Revealing);
    assert_eq!(revealing.score, 100);
    assert_eq!(revealing.streak, 1);
    assert_eq!(revealing.player_progress, 20.0);
    assert_eq!(revealing.correct_option, Some(2));

    let outcome = handle.finished().await.unwrap();

    assert_eq!(outcome.final_score, 100);
    assert_eq!(outcome.best_streak, 1);
    assert_eq!(outcome.coins_earned, 10);
    assert_eq!(outcome.xp_earned, 105);
    assert_eq!(recorder.calls(), 1);
    assert_eq!(recorder.outcomes.lock().unwrap().as_slice(), &[outcome]);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_answer_has_no_effect() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(30), &recorder);

    handle.select_answer(0).await.unwrap();
    handle.select_answer(1).await.unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.score, 100);
    assert_eq!(snapshot.streak, 1);
    assert_eq!(snapshot.selected_option, Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_option_is_rejected_without_side_effects() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(30), &recorder);
    let before = handle.snapshot();

    let result = handle.select_answer(7).await;

    assert_eq!(
        result,
        Err(SessionError::InvalidOption {
            option: 7,
            available: 4
        })
    );
    assert_eq!(handle.snapshot(), before);
    assert_eq!(handle.snapshot().phase, Phase::Active);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_frozen_during_reveal_and_reset_on_advance() {
    let recorder = Recorder::default();
    let handle = start(
        vec![question(1, 100, 0), question(2, 100, 0)],
        config(5),
        &recorder,
    );

    time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(handle.snapshot().time_remaining, 4);

    handle.select_answer(0).await.unwrap();
    time::sleep(Duration::from_secs(1)).await;
    let revealing = handle.snapshot();
    assert_eq!(revealing.phase, Phase::Revealing);
    assert_eq!(revealing.time_remaining, 4);

    // Reveal ends at 3.5s; the next question starts with a full budget.
    time::sleep(Duration::from_millis(1250)).await;
    let next = handle.snapshot();
    assert_eq!(next.phase, Phase::Active);
    assert_eq!(next.current_index, 1);
    assert_eq!(next.time_remaining, 5);
    assert_eq!(next.selected_option, None);
    assert_eq!(next.correct_option, None);

    time::sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.snapshot().time_remaining, 4);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_clock_decrements_once_on_resume() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(10), &recorder);
    let mut updates = handle.subscribe();

    // Jump past three tick deadlines in one step.
    time::advance(Duration::from_millis(3500)).await;
    updates.changed().await.unwrap();
    tokio::task::yield_now().await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.time_remaining, 9);
}

#[tokio::test(start_paused = true)]
async fn test_answer_in_flight_beats_expiring_clock() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 1)], config(1), &recorder);

    let answer = handle.select_answer(1);
    tokio::pin!(answer);

    // Queue the answer without letting the driver run.
    tokio::select! {
        biased;
        _ = &mut answer => panic!("answer resolved before the driver ran"),
        _ = std::future::ready(()) => {}
    }

    // The countdown's only tick is now due at the same instant.
    time::advance(Duration::from_secs(1)).await;
    answer.await.unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, Phase::Revealing);
    assert_eq!(snapshot.selected_option, Some(1));
    assert_eq!(snapshot.score, 100);
    assert_eq!(snapshot.streak, 1);
}

#[tokio::test(start_paused = true)]
async fn test_single_question_goes_straight_to_completed() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 150, 3)], config(10), &recorder);
    let mut updates = handle.subscribe();

    handle.select_answer(3).await.unwrap();

    let mut phases = vec![handle.snapshot().phase];
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        assert!(snapshot.current_index == 0 || snapshot.phase == Phase::Completed);
        if phases.last() != Some(&snapshot.phase) {
            phases.push(snapshot.phase);
        }
    }

    assert_eq!(phases, vec![Phase::Revealing, Phase::Completed]);
    assert_eq!(recorder.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timers_stop_at_completion() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(10), &recorder);

    handle.select_answer(0).await.unwrap();

    // Completed at 2s; the outcome is delivered at 5s.
    time::sleep(Duration::from_millis(2500)).await;
    let settling = handle.snapshot();
    assert_eq!(settling.phase, Phase::Completed);
    assert_eq!(settling.current_index, 1);
    assert!(settling.question.is_none());
    assert_eq!(settling.outcome, Some(Outcome::from_totals(100, 1)));
    assert_eq!(recorder.calls(), 0);

    time::sleep(Duration::from_secs(2)).await;
    let later = handle.snapshot();
    assert_eq!(later.opponent_progress, settling.opponent_progress);
    assert_eq!(later.time_remaining, settling.time_remaining);

    time::sleep(Duration::from_secs(1)).await;
    assert!(handle.is_finished());
    assert_eq!(recorder.calls(), 1);

    // Late deliveries are no-ops.
    assert_eq!(handle.select_answer(0).await, Ok(()));
    assert_eq!(handle.snapshot(), later);
}

#[tokio::test(start_paused = true)]
async fn test_opponent_advances_while_playing() {
    let recorder = Recorder::default();
    let handle = start(
        vec![question(1, 100, 0), question(2, 100, 0), question(3, 100, 0)],
        config(30),
        &recorder,
    );

    handle.select_answer(0).await.unwrap();
    time::sleep(Duration::from_secs(20)).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.opponent_progress > 0.0);
    // One question processed: at most 1/3 of the way plus the jitter.
    assert!(snapshot.opponent_progress <= 100.0 / 3.0 + 10.0);
}

#[tokio::test(start_paused = true)]
async fn test_abandon_skips_completion_callback() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(3), &recorder);

    handle.abandon();
    assert_eq!(handle.finished().await, None);

    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(recorder.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_the_match() {
    let recorder = Recorder::default();
    let handle = start(vec![question(1, 100, 0)], config(3), &recorder);
    let mut updates = handle.subscribe();

    drop(handle);

    // The driver ends and drops its sender.
    while updates.changed().await.is_ok() {}
    time::sleep(Duration::from_secs(30)).await;
    assert_eq!(recorder.calls(), 0);
}
