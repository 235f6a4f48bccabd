//! # quiz-match
//!
//! A timed multiple-choice quiz match against a simulated opponent.
//!
//! The [`engine`] module holds the pure session state machine, scoring and
//! reward rules. The [`runner`] module drives a session on tokio with its
//! countdown, reveal and opponent timers. [`Quiz`] wraps both in a terminal
//! front-end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_match::{default_questions, start_session, MatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quiz_match::QuizError> {
//!     let handle = start_session(default_questions(), MatchConfig::default(), |outcome| {
//!         println!("earned {} coins", outcome.coins_earned);
//!     })?;
//!
//!     handle.select_answer(0).await?;
//!     let outcome = handle.finished().await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

mod app;
mod data;
pub mod engine;
mod models;
pub mod progression;
pub mod runner;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tracing::info;

pub use app::App;
pub use data::{
    default_questions, filter_by_subjects, load_config_from_json, load_questions_from_json,
    parse_questions, LoadError,
};
pub use engine::{MatchConfig, MatchSession, Outcome, Phase, SessionError, Snapshot};
pub use models::{AppState, Difficulty, Question};
pub use progression::Profile;
pub use runner::{start_session, MatchHandle};

/// Redraw interval of the terminal front-end.
const FRAME: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions or settings from file.
    #[error("Failed to load: {0}")]
    Load(#[from] LoadError),
    /// A match could not be started or an answer was rejected.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    /// IO error while driving the terminal.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz front-end that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, config: MatchConfig, profile: Profile) -> Self {
        Self {
            app: App::new(questions, config, profile),
        }
    }

    /// Load a quiz from a JSON question bank.
    pub fn from_json<P: AsRef<Path>>(
        path: P,
        config: MatchConfig,
        profile: Profile,
    ) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(questions, config, profile))
    }

    /// Run the quiz in the terminal until the user quits.
    ///
    /// Must be called from within a tokio runtime. Returns the profile with
    /// every completed match credited.
    pub async fn run(mut self) -> Result<Profile, QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        let result = run_event_loop(guard.terminal(), &mut self.app).await;
        self.app.abandon();
        drop(guard);

        result?;
        Ok(self.app.profile().clone())
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
) -> Result<(), QuizError> {
    loop {
        app.update();
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll without blocking so the match task keeps running on
        // single-threaded runtimes.
        if !event::poll(Duration::ZERO)? {
            tokio::time::sleep(FRAME).await;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code).await? {
                info!("quit requested");
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
async fn handle_input(app: &mut App, key: KeyCode) -> Result<bool, QuizError> {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Match => Ok(handle_match_input(app, key).await),
        AppState::Result => Ok(handle_result_input(app, key)),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> Result<bool, QuizError> {
    match key {
        KeyCode::Enter => {
            app.start_match()?;
            Ok(false)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),
        _ => Ok(false),
    }
}

async fn handle_match_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer().await;
            false
        }
        KeyCode::Char(c @ '1'..='9') => {
            let option = c as usize - '1' as usize;
            app.answer(option).await;
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.abandon();
            true
        }
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}
