//! Advisory progress checkpoints and the processing state machine.

use std::time::Duration;

use shared::{domain::Epoch, protocol::Report};
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender};

use crate::{events::SessionEvent, session::AnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    Normalizing,
    Recognizing,
    Fitting,
    Annotating,
    Complete,
}

impl Checkpoint {
    pub const SEQUENCE: [Checkpoint; 5] = [
        Checkpoint::Normalizing,
        Checkpoint::Recognizing,
        Checkpoint::Fitting,
        Checkpoint::Annotating,
        Checkpoint::Complete,
    ];

    pub fn percent(self) -> u8 {
        match self {
            Checkpoint::Normalizing => 10,
            Checkpoint::Recognizing => 30,
            Checkpoint::Fitting => 60,
            Checkpoint::Annotating => 90,
            Checkpoint::Complete => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Checkpoint::Normalizing => "View 1: normalizing image...",
            Checkpoint::Recognizing => "View 2: recognizing text...",
            Checkpoint::Fitting => "View 3: fitting font sizes...",
            Checkpoint::Annotating => "View 4: annotating results...",
            Checkpoint::Complete => "Processing complete!",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProcessingState {
    #[default]
    Idle,
    Uploading,
    InProgress {
        percent: u8,
        label: &'static str,
    },
    Succeeded(Box<AnalysisResult>),
    Failed(String),
}

impl ProcessingState {
    /// True while a submission owns the request slot.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            ProcessingState::Uploading | ProcessingState::InProgress { .. }
        )
    }

    pub fn percent(&self) -> Option<u8> {
        match self {
            ProcessingState::Uploading => Some(0),
            ProcessingState::InProgress { percent, .. } => Some(*percent),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            ProcessingState::Uploading => Some("Uploading..."),
            ProcessingState::InProgress { label, .. } => Some(*label),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            ProcessingState::Succeeded(result) => Some(&result.report),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ProcessingState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Moves to `checkpoint` if a submission is in flight and the percentage rises.
    pub(crate) fn advance(&mut self, checkpoint: Checkpoint) -> bool {
        let Some(current) = self.percent() else {
            return false;
        };
        if checkpoint.percent() <= current {
            return false;
        }
        *self = ProcessingState::InProgress {
            percent: checkpoint.percent(),
            label: checkpoint.label(),
        };
        true
    }
}

/// Fire-and-forget delayed delivery of `event`; the receiver checks its epoch.
pub(crate) fn schedule(
    runtime: &Handle,
    events: &UnboundedSender<SessionEvent>,
    delay: Duration,
    event: SessionEvent,
) {
    let events = events.clone();
    runtime.spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if events.send(event).is_err() {
            tracing::trace!("session event receiver dropped");
        }
    });
}

pub(crate) fn schedule_checkpoint(
    runtime: &Handle,
    events: &UnboundedSender<SessionEvent>,
    delay: Duration,
    epoch: Epoch,
    checkpoint: Checkpoint,
) {
    schedule(
        runtime,
        events,
        delay,
        SessionEvent::Checkpoint { epoch, checkpoint },
    );
}

#[cfg(test)]
#[path = "tests/progress_tests.rs"]
mod tests;
