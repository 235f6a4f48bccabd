//! Match configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SessionError;

pub const DEFAULT_BUDGET_SECONDS: u32 = 30;
pub const DEFAULT_STREAK_BONUS: u32 = 10;
pub const DEFAULT_REVEAL_SECONDS: u32 = 2;
pub const DEFAULT_SETTLE_SECONDS: u32 = 3;
pub const DEFAULT_PROGRESS_STEP: f64 = 20.0;

/// Tunables for one match. Every field has a default so partial JSON
/// config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Countdown per question, in clock units.
    pub budget_seconds: u32,
    /// Extra points per level of streak carried into a correct answer.
    pub streak_bonus_per_level: u32,
    /// How long the correct answer stays on screen before advancing.
    pub reveal_window_seconds: u32,
    /// Delay between completion and delivery of the outcome.
    pub settle_delay_seconds: u32,
    /// Player progress gained per correct answer, in percentage points.
    pub progress_step: f64,
    /// Length of one clock unit in milliseconds.
    pub tick_millis: u64,
    pub opponent_tick_millis: u64,
    /// Upper bound on opponent progress gained in a single tick.
    pub opponent_max_step: f64,
    /// Random allowance the opponent may run ahead of the question index.
    pub opponent_jitter: f64,
    /// Seed for the opponent simulator; random when absent.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            budget_seconds: DEFAULT_BUDGET_SECONDS,
            streak_bonus_per_level: DEFAULT_STREAK_BONUS,
            reveal_window_seconds: DEFAULT_REVEAL_SECONDS,
            settle_delay_seconds: DEFAULT_SETTLE_SECONDS,
            progress_step: DEFAULT_PROGRESS_STEP,
            tick_millis: 1000,
            opponent_tick_millis: 1000,
            opponent_max_step: 3.0,
            opponent_jitter: 10.0,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        let invalid = |reason: &str| -> Result<(), SessionError> {
            Err(SessionError::InvalidConfiguration(reason.to_string()))
        };

        if self.budget_seconds == 0 {
            return invalid("budget_seconds must be greater than zero");
        }
        if self.reveal_window_seconds == 0 {
            return invalid("reveal_window_seconds must be greater than zero");
        }
        if self.tick_millis == 0 || self.opponent_tick_millis == 0 {
            return invalid("tick intervals must be greater than zero");
        }
        if self
            .tick_period()
            .checked_mul(self.reveal_window_seconds)
            .is_none()
            || self
                .tick_period()
                .checked_mul(self.settle_delay_seconds)
                .is_none()
        {
            return invalid("reveal and settle windows overflow the tick period");
        }
        if !(self.progress_step > 0.0 && self.progress_step <= 100.0) {
            return invalid("progress_step must be within (0, 100]");
        }
        if !self.opponent_max_step.is_finite() || self.opponent_max_step < 0.0 {
            return invalid("opponent_max_step must be a non-negative number");
        }
        if !self.opponent_jitter.is_finite() || self.opponent_jitter < 0.0 {
            return invalid("opponent_jitter must be a non-negative number");
        }

        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn opponent_period(&self) -> Duration {
        Duration::from_millis(self.opponent_tick_millis)
    }

    /// Reveal and settle windows are measured in clock units.
    pub fn reveal_window(&self) -> Duration {
        self.tick_period() * self.reveal_window_seconds
    }

    pub fn settle_delay(&self) -> Duration {
        self.tick_period() * self.settle_delay_seconds
    }
}
