//! The match session state machine.
//!
//! A session moves through `Active(i) -> Revealing(i) -> Active(i + 1)` for
//! each question and ends in `Completed`. Every event is applied by a single
//! method that either performs one whole transition or does nothing, so the
//! state is never observed half-updated.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::models::{Difficulty, Question};

use super::config::MatchConfig;
use super::error::SessionError;
use super::opponent::OpponentSimulator;
use super::rewards::Outcome;
use super::scoring::{advance_progress, score_answer};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The current question is live and its countdown is running.
    Active,
    /// The current question has been resolved; the countdown is frozen.
    Revealing,
    /// Every question has been processed. Terminal.
    Completed,
}

/// An event that can be pending in one scheduling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Answer(usize),
    ClockTick,
    RevealElapsed,
}

impl SessionEvent {
    /// Lower runs first. An answer beats a countdown expiry that is due in
    /// the same step.
    fn priority(&self) -> u8 {
        match self {
            SessionEvent::Answer(_) => 0,
            SessionEvent::ClockTick => 1,
            SessionEvent::RevealElapsed => 2,
        }
    }
}

/// How a question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub question_index: usize,
    /// `None` when the countdown ran out.
    pub selected: Option<usize>,
    pub correct: bool,
    pub points: u32,
    pub streak: u32,
}

impl Resolution {
    pub fn timed_out(&self) -> bool {
        self.selected.is_none()
    }
}

/// What a single event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event was redundant or out of order and had no effect.
    Ignored,
    /// The countdown moved one unit; the question is still live.
    Ticked { time_remaining: u32 },
    /// `Active -> Revealing`.
    Resolved(Resolution),
    /// `Revealing -> Active` on the next question.
    Advanced { question_index: usize },
    /// `Revealing -> Completed` after the last question.
    Completed(Outcome),
}

/// The current question as shown to the player. Never carries the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub subject: String,
    pub difficulty: Difficulty,
    pub points: u32,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            options: question.options.clone(),
            subject: question.subject.clone(),
            difficulty: question.difficulty,
            points: question.points,
        }
    }
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub budget_seconds: u32,
    pub time_remaining: u32,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub player_progress: f64,
    pub opponent_progress: f64,
    pub selected_option: Option<usize>,
    /// Only populated while revealing.
    pub correct_option: Option<usize>,
    /// `None` once completed.
    pub question: Option<QuestionView>,
    pub outcome: Option<Outcome>,
}

/// State of one match, exclusively owned by whoever drives it.
#[derive(Debug, Clone)]
pub struct MatchSession {
    questions: Vec<Question>,
    config: MatchConfig,
    opponent: OpponentSimulator,
    current_index: usize,
    phase: Phase,
    selected_option: Option<usize>,
    score: u32,
    streak: u32,
    best_streak: u32,
    time_remaining: u32,
    player_progress: f64,
    opponent_progress: f64,
    outcome: Option<Outcome>,
}

impl MatchSession {
    /// Starts a session on the first question.
    ///
    /// Fails with [`SessionError::InvalidConfiguration`] if `questions` is
    /// empty, a question is malformed, or `config` does not validate.
    pub fn start(questions: Vec<Question>, config: MatchConfig) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::InvalidConfiguration(
                "question sequence is empty".to_string(),
            ));
        }
        config.validate()?;
        for question in &questions {
            question.validate().map_err(|reason| {
                SessionError::InvalidConfiguration(format!("question {}: {}", question.id, reason))
            })?;
        }

        info!(
            questions = questions.len(),
            budget = config.budget_seconds,
            "match session started"
        );

        Ok(Self {
            opponent: OpponentSimulator::new(config.opponent_max_step, config.opponent_jitter),
            time_remaining: config.budget_seconds,
            questions,
            config,
            current_index: 0,
            phase: Phase::Active,
            selected_option: None,
            score: 0,
            streak: 0,
            best_streak: 0,
            player_progress: 0.0,
            opponent_progress: 0.0,
            outcome: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn player_progress(&self) -> f64 {
        self.player_progress
    }

    pub fn opponent_progress(&self) -> f64 {
        self.opponent_progress
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The question in play, or `None` once completed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Completed => None,
            _ => self.questions.get(self.current_index),
        }
    }

    /// The frozen outcome, available once completed.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Recomputes the outcome from the terminal state.
    pub fn compute_outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Completed => Some(Outcome::from_totals(self.score, self.best_streak)),
            _ => None,
        }
    }

    /// One unit of the session clock.
    pub fn advance_clock(&mut self) -> Transition {
        if self.phase != Phase::Active {
            return Transition::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        trace!(
            question = self.current_index,
            remaining = self.time_remaining,
            "clock tick"
        );

        if self.time_remaining == 0 {
            debug!(question = self.current_index, "time is up");
            Transition::Resolved(self.resolve(None))
        } else {
            Transition::Ticked {
                time_remaining: self.time_remaining,
            }
        }
    }

    /// Locks in the player's answer for the current question.
    ///
    /// Outside `Active` this is a no-op, so a duplicate delivery cannot
    /// change an answer already given.
    pub fn select_answer(&mut self, option: usize) -> Result<Transition, SessionError> {
        if self.phase != Phase::Active {
            debug!(option, phase = ?self.phase, "answer ignored");
            return Ok(Transition::Ignored);
        }

        let available = self.questions[self.current_index].options.len();
        if option >= available {
            warn!(option, available, "answer rejected");
            return Err(SessionError::InvalidOption { option, available });
        }

        Ok(Transition::Resolved(self.resolve(Some(option))))
    }

    /// End of the reveal window: next question, or completion.
    pub fn reveal_elapsed(&mut self) -> Transition {
        if self.phase != Phase::Revealing {
            return Transition::Ignored;
        }

        self.selected_option = None;

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.time_remaining = self.config.budget_seconds;
            self.phase = Phase::Active;
            debug!(question = self.current_index, "advanced to next question");
            return Transition::Advanced {
                question_index: self.current_index,
            };
        }

        self.current_index = self.questions.len();
        self.phase = Phase::Completed;
        let outcome = Outcome::from_totals(self.score, self.best_streak);
        self.outcome = Some(outcome);
        info!(
            score = outcome.final_score,
            best_streak = outcome.best_streak,
            coins = outcome.coins_earned,
            xp = outcome.xp_earned,
            "match session completed"
        );
        Transition::Completed(outcome)
    }

    /// Applies one opponent tick. Only `opponent_progress` is written.
    ///
    /// Returns the new progress, or `None` once completed.
    pub fn tick_opponent<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> Option<f64> {
        if self.phase == Phase::Completed {
            return None;
        }

        self.opponent_progress = self.opponent.next_progress(
            self.opponent_progress,
            self.current_index,
            self.questions.len(),
            rng,
        );
        trace!(progress = self.opponent_progress, "opponent tick");
        Some(self.opponent_progress)
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<Transition, SessionError> {
        match event {
            SessionEvent::Answer(option) => self.select_answer(option),
            SessionEvent::ClockTick => Ok(self.advance_clock()),
            SessionEvent::RevealElapsed => Ok(self.reveal_elapsed()),
        }
    }

    /// Applies every event pending in one scheduling step.
    ///
    /// Answers are applied before clock ticks, and clock ticks before
    /// reveal timeouts, whatever order they arrived in.
    pub fn step(&mut self, events: &[SessionEvent]) -> Vec<Result<Transition, SessionError>> {
        let mut ordered = events.to_vec();
        ordered.sort_by_key(SessionEvent::priority);
        ordered.into_iter().map(|event| self.apply(event)).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let question = self.current_question();

        Snapshot {
            phase: self.phase,
            current_index: self.current_index,
            total_questions: self.questions.len(),
            budget_seconds: self.config.budget_seconds,
            time_remaining: self.time_remaining,
            score: self.score,
            streak: self.streak,
            best_streak: self.best_streak,
            player_progress: self.player_progress,
            opponent_progress: self.opponent_progress,
            selected_option: self.selected_option,
            correct_option: match self.phase {
                Phase::Revealing => question.map(|q| q.correct_answer),
                _ => None,
            },
            question: question.map(QuestionView::from),
            outcome: self.outcome,
        }
    }

    fn resolve(&mut self, selected: Option<usize>) -> Resolution {
        let question = &self.questions[self.current_index];
        let award = score_answer(
            question,
            selected,
            self.streak,
            self.config.streak_bonus_per_level,
        );

        self.score = self.score.saturating_add(award.points);
        self.streak = award.streak;
        self.best_streak = self.best_streak.max(self.streak);
        if award.correct {
            self.player_progress = advance_progress(self.player_progress, self.config.progress_step);
        }
        self.selected_option = selected;
        self.phase = Phase::Revealing;

        debug!(
            question = self.current_index,
            ?selected,
            correct = award.correct,
            points = award.points,
            streak = self.streak,
            "question resolved"
        );

        Resolution {
            question_index: self.current_index,
            selected,
            correct: award.correct,
            points: award.points,
            streak: award.streak,
        }
    }
}
