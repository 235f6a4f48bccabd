//! Simulated opponent progress.
//!
//! Display-only: nothing here feeds back into scoring.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentSimulator {
    max_step: f64,
    jitter: f64,
}

impl OpponentSimulator {
    pub fn new(max_step: f64, jitter: f64) -> Self {
        Self { max_step, jitter }
    }

    /// Computes the opponent's progress after one tick.
    ///
    /// The opponent gains at most `max_step` points per tick and may not pass
    /// the player's question position plus a random jitter allowance. The
    /// result never drops below `current` and never exceeds 100.
    pub fn next_progress<R: Rng + ?Sized>(
        &self,
        current: f64,
        question_index: usize,
        total_questions: usize,
        rng: &mut R,
    ) -> f64 {
        let step = self.max_step * rng.random::<f64>();
        let position = if total_questions == 0 {
            100.0
        } else {
            question_index as f64 / total_questions as f64 * 100.0
        };
        let bound = position + self.jitter * rng.random::<f64>();

        (current + step).min(bound).max(current).min(100.0)
    }
}
