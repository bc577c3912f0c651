//! Events delivered to the host loop by request and timer tasks.

use shared::{domain::Epoch, error::ClientError, protocol::ProcessOutcome};

use crate::progress::Checkpoint;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A scheduled advisory checkpoint came due.
    Checkpoint {
        epoch: Epoch,
        checkpoint: Checkpoint,
    },
    /// The single upload request of a submission finished.
    Response {
        epoch: Epoch,
        result: Result<ProcessOutcome, ClientError>,
    },
    /// Pacing delay after the final checkpoint elapsed.
    DisplayReady { epoch: Epoch },
}

impl SessionEvent {
    pub fn epoch(&self) -> Epoch {
        match self {
            SessionEvent::Checkpoint { epoch, .. }
            | SessionEvent::Response { epoch, .. }
            | SessionEvent::DisplayReady { epoch } => *epoch,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Checkpoint { .. } => "checkpoint",
            SessionEvent::Response { .. } => "response",
            SessionEvent::DisplayReady { .. } => "display_ready",
        }
    }
}
