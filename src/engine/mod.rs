//! Match session engine.
//!
//! Pure and synchronous: timers live in [`crate::runner`], which feeds
//! clock ticks, reveal timeouts and player answers into a [`MatchSession`].

mod config;
mod error;
mod opponent;
mod rewards;
mod scoring;
mod session;

pub use config::MatchConfig;
pub use error::SessionError;
pub use opponent::OpponentSimulator;
pub use rewards::Outcome;
pub use scoring::{score_answer, Award};
pub use session::{
    MatchSession, Phase, QuestionView, Resolution, SessionEvent, Snapshot, Transition,
};
