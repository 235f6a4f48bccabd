//! The task that owns a running match and its timers.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::engine::{MatchSession, Outcome, SessionError, Snapshot, Transition};

/// Requests sent from a [`super::MatchHandle`] to its driver.
#[derive(Debug)]
pub(crate) enum MatchCommand {
    SelectAnswer {
        option: usize,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
}

type Timer = Option<Pin<Box<Sleep>>>;

/// Drives one session. Every mutation of the session happens on this task.
///
/// A timer that is `None` is stopped: the session clock only exists while a
/// question is live, the reveal timer only while revealing, and nothing but
/// the settle timer survives completion.
pub(crate) struct Driver {
    session: MatchSession,
    commands: mpsc::UnboundedReceiver<MatchCommand>,
    snapshots: watch::Sender<Snapshot>,
    cancel: CancellationToken,
    rng: StdRng,
    clock: Option<Interval>,
    opponent: Option<Interval>,
    reveal: Timer,
    settle: Timer,
}

impl Driver {
    pub(crate) fn new(
        session: MatchSession,
        commands: mpsc::UnboundedReceiver<MatchCommand>,
        snapshots: watch::Sender<Snapshot>,
        cancel: CancellationToken,
        rng: StdRng,
    ) -> Self {
        let clock = Some(periodic(session.config().tick_period()));
        let opponent = Some(periodic(session.config().opponent_period()));

        Self {
            session,
            commands,
            snapshots,
            cancel,
            rng,
            clock,
            opponent,
            reveal: None,
            settle: None,
        }
    }

    /// Runs the match to completion and hands the outcome to `on_complete`.
    ///
    /// Returns `None` without calling `on_complete` if the match is
    /// cancelled first.
    pub(crate) async fn run<F>(mut self, on_complete: F) -> Option<Outcome>
    where
        F: FnOnce(Outcome),
    {
        let mut on_complete = Some(on_complete);

        loop {
            // Branch order is the tie-break: a player command that is ready
            // in the same step as a clock expiry is applied first.
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    info!(phase = ?self.session.phase(), "match abandoned");
                    return None;
                }
                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                }
                _ = next_tick(&mut self.clock) => {
                    let transition = self.session.advance_clock();
                    self.on_transition(transition);
                }
                _ = expired(&mut self.reveal) => {
                    self.reveal = None;
                    let transition = self.session.reveal_elapsed();
                    self.on_transition(transition);
                }
                _ = expired(&mut self.settle) => {
                    self.settle = None;
                    let outcome = self.session.outcome();
                    if let (Some(outcome), Some(callback)) = (outcome, on_complete.take()) {
                        info!(score = outcome.final_score, "delivering match outcome");
                        callback(outcome);
                    }
                    return outcome;
                }
                _ = next_tick(&mut self.opponent) => {
                    if let Some(progress) = self.session.tick_opponent(&mut self.rng) {
                        trace!(progress, "opponent progress");
                        self.publish();
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, command: MatchCommand) {
        match command {
            MatchCommand::SelectAnswer { option, reply } => {
                let result = match self.session.select_answer(option) {
                    Ok(transition) => {
                        self.on_transition(transition);
                        Ok(())
                    }
                    Err(err) => Err(err),
                };
                // The caller may have stopped waiting.
                let _ = reply.send(result);
            }
        }
    }

    fn on_transition(&mut self, transition: Transition) {
        let config = self.session.config();

        match transition {
            Transition::Ignored => return,
            Transition::Ticked { .. } => {}
            Transition::Resolved(resolution) => {
                self.clock = None;
                self.reveal = Some(Box::pin(time::sleep(config.reveal_window())));
                debug!(
                    question = resolution.question_index,
                    timed_out = resolution.timed_out(),
                    "clock stopped, revealing answer"
                );
            }
            Transition::Advanced { question_index } => {
                self.clock = Some(periodic(config.tick_period()));
                debug!(question = question_index, "clock restarted");
            }
            Transition::Completed(_) => {
                self.clock = None;
                self.opponent = None;
                self.reveal = None;
                self.settle = Some(Box::pin(time::sleep(config.settle_delay())));
                debug!("clock and opponent stopped, settling");
            }
        }

        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }
}

/// An interval whose first tick is one period away. Ticks missed while the
/// scheduler was stalled are not replayed in a burst.
fn periodic(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

async fn expired(timer: &mut Timer) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
