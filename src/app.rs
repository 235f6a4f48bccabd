use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::{MatchConfig, Outcome, SessionError, Snapshot};
use crate::models::{AppState, Question};
use crate::progression::Profile;
use crate::runner::{start_session, MatchHandle};

/// Terminal front-end state: one match at a time plus the player profile.
pub struct App {
    pub state: AppState,
    questions: Vec<Question>,
    config: MatchConfig,
    profile: Profile,
    handle: Option<MatchHandle>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    cursor: usize,
    cursor_question: usize,
    last_outcome: Option<Outcome>,
    last_error: Option<String>,
}

impl App {
    pub fn new(questions: Vec<Question>, config: MatchConfig, profile: Profile) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            state: AppState::Welcome,
            questions,
            config,
            profile,
            handle: None,
            outcome_tx,
            outcome_rx,
            cursor: 0,
            cursor_question: 0,
            last_outcome: None,
            last_error: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Distinct subjects in bank order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for question in &self.questions {
            if !subjects.contains(&question.subject.as_str()) {
                subjects.push(&question.subject);
            }
        }
        subjects
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.handle.as_ref().map(MatchHandle::snapshot)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn start_match(&mut self) -> Result<(), SessionError> {
        let outcomes = self.outcome_tx.clone();
        let handle = start_session(self.questions.clone(), self.config.clone(), move |outcome| {
            // The receiver lives as long as the app.
            let _ = outcomes.send(outcome);
        })?;

        debug!(match_id = %handle.id(), "match started from front-end");
        self.handle = Some(handle);
        self.cursor = 0;
        self.cursor_question = 0;
        self.last_error = None;
        self.state = AppState::Match;
        Ok(())
    }

    /// Picks up a delivered outcome and keeps the cursor on the live question.
    pub fn update(&mut self) {
        if let Ok(outcome) = self.outcome_rx.try_recv() {
            self.profile.apply(&outcome);
            self.last_outcome = Some(outcome);
            self.handle = None;
            self.state = AppState::Result;
            return;
        }

        if let Some(snapshot) = self.snapshot() {
            if snapshot.current_index != self.cursor_question {
                self.cursor_question = snapshot.current_index;
                self.cursor = 0;
                self.last_error = None;
            }
        }
    }

    fn option_count(&self) -> usize {
        self.snapshot()
            .and_then(|s| s.question)
            .map_or(0, |q| q.options.len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    pub async fn submit_answer(&mut self) {
        self.answer(self.cursor).await;
    }

    pub async fn answer(&mut self, option: usize) {
        let result = match &self.handle {
            Some(handle) => handle.select_answer(option).await,
            None => return,
        };

        match result {
            Ok(()) => {
                self.cursor = option;
                self.last_error = None;
            }
            Err(err) => {
                warn!(%err, "answer not accepted");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Abandons any running match and returns to the welcome screen.
    pub fn restart(&mut self) {
        self.abandon();
        self.state = AppState::Welcome;
        self.last_outcome = None;
        self.last_error = None;
    }

    pub fn abandon(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abandon();
        }
    }
}
