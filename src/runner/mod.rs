//! Scheduling for running matches.
//!
//! Each match runs on its own tokio task that owns the session, the session
//! clock, the reveal and settle timers, and the opponent ticker. Callers talk
//! to it through a [`MatchHandle`].

mod driver;
mod handle;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::engine::{MatchConfig, MatchSession, Outcome, SessionError};
use crate::models::Question;

use driver::Driver;

pub use handle::MatchHandle;

/// Starts a match on the current tokio runtime.
///
/// `on_complete` runs exactly once, after the last question is resolved and
/// the settle delay has elapsed. It never runs for an abandoned match.
///
/// # Errors
///
/// [`SessionError::InvalidConfiguration`] if `questions` is empty or
/// `config` is invalid. No task is spawned in that case.
pub fn start_session<F>(
    questions: Vec<Question>,
    config: MatchConfig,
    on_complete: F,
) -> Result<MatchHandle, SessionError>
where
    F: FnOnce(Outcome) + Send + 'static,
{
    let session = MatchSession::start(questions, config)?;
    let rng = match session.config().seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let id = Uuid::new_v4();
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (snapshots_tx, snapshots_rx) = watch::channel(session.snapshot());
    let cancel = CancellationToken::new();

    let driver = Driver::new(session, commands_rx, snapshots_tx, cancel.clone(), rng);
    let task = tokio::spawn(
        driver
            .run(on_complete)
            .instrument(info_span!("match", match_id = %id)),
    );

    Ok(MatchHandle::new(id, commands_tx, snapshots_rx, cancel, task))
}
