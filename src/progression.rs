//! Player progression: where match outcomes end up.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::Outcome;

/// How many recent outcomes a profile remembers.
pub const RECENT_OUTCOMES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub coins: u64,
    pub xp: u64,
    pub total_matches: u32,
    /// Most recent outcomes, newest last.
    pub recent: Vec<Outcome>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            coins: 0,
            xp: 0,
            total_matches: 0,
            recent: Vec::new(),
        }
    }

    /// Credits a finished match to the profile.
    pub fn apply(&mut self, outcome: &Outcome) {
        self.coins += u64::from(outcome.coins_earned);
        self.xp += u64::from(outcome.xp_earned);
        self.total_matches += 1;
        self.recent.push(*outcome);

        if self.recent.len() > RECENT_OUTCOMES {
            self.recent.remove(0);
        }

        info!(
            player = %self.display_name,
            coins = self.coins,
            xp = self.xp,
            matches = self.total_matches,
            "profile updated"
        );
    }

    pub fn best_score(&self) -> Option<u32> {
        self.recent.iter().map(|o| o.final_score).max()
    }
}
