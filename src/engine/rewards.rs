//! Translation of a finished match into currency and experience.

use serde::{Deserialize, Serialize};

pub const SCORE_PER_COIN: u32 = 10;
pub const XP_PER_STREAK_LEVEL: u32 = 5;

/// The immutable result of a completed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub final_score: u32,
    pub best_streak: u32,
    pub coins_earned: u32,
    pub xp_earned: u32,
}

impl Outcome {
    /// Derives rewards from the final score and the best streak seen.
    ///
    /// Pure: the same inputs always give the same outcome.
    pub fn from_totals(final_score: u32, best_streak: u32) -> Self {
        Self {
            final_score,
            best_streak,
            coins_earned: final_score / SCORE_PER_COIN,
            xp_earned: final_score
                .saturating_add(best_streak.saturating_mul(XP_PER_STREAK_LEVEL)),
        }
    }
}
