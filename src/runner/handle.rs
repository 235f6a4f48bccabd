use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::engine::{Outcome, SessionError, Snapshot};

use super::driver::MatchCommand;

/// Handle to a running match.
///
/// Dropping the handle abandons the match and stops its timers.
pub struct MatchHandle {
    id: Uuid,
    commands: mpsc::UnboundedSender<MatchCommand>,
    snapshots: watch::Receiver<Snapshot>,
    cancel: CancellationToken,
    task: JoinHandle<Option<Outcome>>,
    _abandon_on_drop: DropGuard,
}

impl MatchHandle {
    pub(crate) fn new(
        id: Uuid,
        commands: mpsc::UnboundedSender<MatchCommand>,
        snapshots: watch::Receiver<Snapshot>,
        cancel: CancellationToken,
        task: JoinHandle<Option<Outcome>>,
    ) -> Self {
        Self {
            id,
            commands,
            snapshots,
            _abandon_on_drop: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest published state of the match.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Submits an answer for the current question.
    ///
    /// Fails only with [`SessionError::InvalidOption`]. Answers that arrive
    /// after the question was resolved, or after the match ended, are
    /// accepted and ignored.
    pub async fn select_answer(&self, option: usize) -> Result<(), SessionError> {
        let (reply, response) = oneshot::channel();

        if self
            .commands
            .send(MatchCommand::SelectAnswer { option, reply })
            .is_err()
        {
            debug!(match_id = %self.id, option, "answer after match ended ignored");
            return Ok(());
        }

        match response.await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    match_id = %self.id,
                    option,
                    task_finished = self.task.is_finished(),
                    "match task stopped before replying"
                );
                Ok(())
            }
        }
    }

    /// Stops the match. The completion callback will not run.
    pub fn abandon(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the match task to end.
    ///
    /// Returns the outcome if the match completed, `None` if it was abandoned.
    pub async fn finished(self) -> Option<Outcome> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(match_id = %self.id, %err, "match task failed");
                None
            }
        }
    }
}
