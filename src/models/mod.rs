mod question;

pub use question::{Difficulty, Question};

/// Which screen the terminal front-end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Match,
    Result,
}
