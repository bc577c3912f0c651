//! Submit lifecycle: one upload per submission, advisory progress, outcome reconciliation.

use std::sync::Arc;

use shared::{
    domain::{Epoch, MessageKind},
    error::ClientError,
};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    events::SessionEvent,
    progress::{schedule, schedule_checkpoint, Checkpoint},
    session::Session,
    transport::{AcceptedHook, AnalysisService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started(Epoch),
    /// A submission is already in flight; the action was inert.
    Ignored,
}

pub struct RequestOrchestrator {
    service: Arc<dyn AnalysisService>,
    settings: ClientSettings,
    runtime: Handle,
    events: UnboundedSender<SessionEvent>,
    inflight: Option<(Epoch, JoinHandle<()>)>,
}

impl RequestOrchestrator {
    /// Builds an orchestrator and the receiver the host loop drains into
    /// [`RequestOrchestrator::handle_event`].
    pub fn new(
        service: Arc<dyn AnalysisService>,
        settings: ClientSettings,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                settings,
                runtime,
                events,
                inflight: None,
            },
            rx,
        )
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn service(&self) -> Arc<dyn AnalysisService> {
        Arc::clone(&self.service)
    }

    pub fn submit(&mut self, session: &mut Session) -> Result<SubmitOutcome, ClientError> {
        if session.state().is_in_flight() {
            debug!(epoch = session.epoch().0, "submit ignored while a request is in flight");
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(file) = session.selected_file().cloned() else {
            let err = ClientError::NoFileSelected;
            session.show_message(err.user_message(), MessageKind::Error);
            return Err(err);
        };

        let epoch = session.begin_submission();
        session.state_mut().advance(Checkpoint::Normalizing);
        info!(epoch = epoch.0, name = file.name(), "submission started");

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        let timeout = self.settings.request_timeout;
        let accepted_events = self.events.clone();
        let on_accepted: AcceptedHook = Box::new(move || {
            let _ = accepted_events.send(SessionEvent::Checkpoint {
                epoch,
                checkpoint: Checkpoint::Fitting,
            });
        });
        let request = self.runtime.spawn(async move {
            let process = service.process(file, on_accepted);
            let result = match tokio::time::timeout(timeout, process).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Timeout { after: timeout }),
            };
            if events.send(SessionEvent::Response { epoch, result }).is_err() {
                debug!(epoch = epoch.0, "response dropped; session loop gone");
            }
        });
        self.inflight = Some((epoch, request));

        schedule_checkpoint(
            &self.runtime,
            &self.events,
            self.settings.checkpoint_delay,
            epoch,
            Checkpoint::Recognizing,
        );

        Ok(SubmitOutcome::Started(epoch))
    }

    /// Applies one event from the channel returned by [`RequestOrchestrator::new`].
    pub fn handle_event(&mut self, session: &mut Session, event: SessionEvent) {
        let epoch = event.epoch();
        if epoch != session.epoch() {
            debug!(
                event = event.name(),
                epoch = epoch.0,
                current = session.epoch().0,
                "discarding stale session event"
            );
            return;
        }

        match event {
            SessionEvent::Checkpoint { checkpoint, .. } => {
                if checkpoint == Checkpoint::Complete && !session.has_pending() {
                    return;
                }
                if !session.state_mut().advance(checkpoint) {
                    debug!(epoch = epoch.0, percent = checkpoint.percent(), "checkpoint skipped");
                    return;
                }
                debug!(epoch = epoch.0, percent = checkpoint.percent(), "checkpoint applied");
                if checkpoint == Checkpoint::Complete {
                    schedule(
                        &self.runtime,
                        &self.events,
                        self.settings.display_delay,
                        SessionEvent::DisplayReady { epoch },
                    );
                }
            }
            SessionEvent::Response { result, .. } => {
                self.clear_inflight(epoch);
                if !session.state().is_in_flight() {
                    debug!(epoch = epoch.0, "response arrived after submission ended");
                    return;
                }
                match result {
                    Ok(outcome) => {
                        info!(
                            epoch = epoch.0,
                            fitted = outcome.report.fitted_texts,
                            "analysis succeeded"
                        );
                        session.state_mut().advance(Checkpoint::Annotating);
                        session.hold_pending(outcome);
                        schedule_checkpoint(
                            &self.runtime,
                            &self.events,
                            self.settings.checkpoint_delay,
                            epoch,
                            Checkpoint::Complete,
                        );
                    }
                    Err(err) => self.fail(session, epoch, err),
                }
            }
            SessionEvent::DisplayReady { .. } => {
                if session.complete(&self.settings) {
                    info!(epoch = epoch.0, "results ready");
                }
            }
        }
    }

    /// Aborts the in-flight request, failing the submission with `Cancelled`.
    pub fn cancel(&mut self, session: &mut Session) -> bool {
        if !session.state().is_in_flight() {
            return false;
        }
        let epoch = session.epoch();
        if let Some((_, request)) = self.inflight.take() {
            request.abort();
        }
        session.retire_epoch();
        self.fail(session, epoch, ClientError::Cancelled);
        true
    }

    /// Drains events until the current submission succeeds or fails.
    /// `observe` runs after every applied event.
    pub async fn run_until_settled(
        &mut self,
        session: &mut Session,
        events: &mut UnboundedReceiver<SessionEvent>,
        mut observe: impl FnMut(&Session),
    ) {
        while session.state().is_in_flight() {
            let Some(event) = events.recv().await else {
                warn!("session event channel closed mid-submission");
                return;
            };
            self.handle_event(session, event);
            observe(session);
        }
    }

    fn clear_inflight(&mut self, epoch: Epoch) {
        if self
            .inflight
            .as_ref()
            .is_some_and(|(inflight_epoch, _)| *inflight_epoch == epoch)
        {
            self.inflight = None;
        }
    }

    fn fail(&mut self, session: &mut Session, epoch: Epoch, err: ClientError) {
        warn!(epoch = epoch.0, "submission failed: {err}");
        session.fail(&err);
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
