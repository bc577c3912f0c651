//! The single UI-scoped state object handed to every component.

use shared::{
    domain::{Epoch, MessageKind, TaskId, ViewKind},
    error::ClientError,
    protocol::{ImagePaths, ProcessOutcome, Report},
};

use crate::{
    config::ClientSettings,
    intake::{FileCandidate, FileIntake, SelectedFile},
    progress::ProcessingState,
    projector::{self, DisplayStat, Distribution},
    view::{UserMessage, ViewController},
};

/// Absolute artifact URLs for the four views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImages {
    urls: [String; 4],
}

impl ResolvedImages {
    pub fn resolve(paths: &ImagePaths, settings: &ClientSettings) -> Self {
        Self {
            urls: ViewKind::ALL.map(|view| settings.resolve(paths.get(view))),
        }
    }

    pub fn get(&self, view: ViewKind) -> &str {
        let index = ViewKind::ALL
            .iter()
            .position(|candidate| *candidate == view)
            .unwrap_or_default();
        &self.urls[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewKind, &str)> {
        ViewKind::ALL
            .into_iter()
            .zip(self.urls.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub task_id: Option<TaskId>,
    pub report: Report,
    pub images: ResolvedImages,
}

#[derive(Debug, Default)]
pub struct Session {
    intake: FileIntake,
    state: ProcessingState,
    epoch: Epoch,
    view: ViewController,
    pending: Option<ProcessOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.intake.selected()
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn message(&self) -> Option<&UserMessage> {
        self.view.message()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ProcessingState::Succeeded(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.intake.selected().is_some() && !self.state.is_in_flight()
    }

    pub fn progress_visible(&self) -> bool {
        self.state.is_in_flight()
    }

    pub fn results_visible(&self) -> bool {
        self.result().is_some()
    }

    /// Stages a picked file; rejections surface as an error message.
    pub fn select_file(&mut self, candidate: FileCandidate) -> Result<(), ClientError> {
        let outcome = self.intake.select_file(candidate).map(|_| ());
        self.report_intake(outcome)
    }

    pub fn drop_file(&mut self, candidate: FileCandidate) -> Result<(), ClientError> {
        let outcome = self.intake.drop_file(candidate).map(|_| ());
        self.report_intake(outcome)
    }

    pub fn drag_over(&mut self) {
        self.intake.drag_over();
    }

    pub fn drag_leave(&mut self) {
        self.intake.drag_leave();
    }

    fn report_intake(&mut self, outcome: Result<(), ClientError>) -> Result<(), ClientError> {
        if let Err(err) = &outcome {
            self.view.show_message(err.user_message(), MessageKind::Error);
        }
        outcome
    }

    /// Switches the visible artifact view; has no effect on data.
    pub fn select_view(&mut self, view: ViewKind) {
        self.view.select_view(view);
    }

    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.view.show_message(text, kind);
    }

    pub fn stats(&self) -> Option<Vec<DisplayStat>> {
        self.state.report().map(projector::project)
    }

    pub fn distribution(&self) -> Option<Distribution> {
        self.state.report().map(projector::rank_distribution)
    }

    pub(crate) fn state_mut(&mut self) -> &mut ProcessingState {
        &mut self.state
    }

    /// Starts a new submission epoch: clears the previous message and result.
    pub(crate) fn begin_submission(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.view.clear_message();
        self.pending = None;
        self.state = ProcessingState::Uploading;
        self.epoch
    }

    /// Retires the current epoch so updates already scheduled under it are dropped.
    pub(crate) fn retire_epoch(&mut self) {
        self.epoch = self.epoch.next();
    }

    pub(crate) fn hold_pending(&mut self, outcome: ProcessOutcome) {
        self.pending = Some(outcome);
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn complete(&mut self, settings: &ClientSettings) -> bool {
        let Some(outcome) = self.pending.take() else {
            return false;
        };
        let fitted = outcome.report.fitted_texts;
        self.state = ProcessingState::Succeeded(Box::new(AnalysisResult {
            task_id: outcome.task_id,
            images: ResolvedImages::resolve(&outcome.images, settings),
            report: outcome.report,
        }));
        self.view.reset();
        self.view.show_message(
            format!("Analysis complete: {fitted} text regions detected"),
            MessageKind::Success,
        );
        true
    }

    pub(crate) fn fail(&mut self, err: &ClientError) {
        self.pending = None;
        self.state = ProcessingState::Failed(err.to_string());
        self.view.show_message(err.user_message(), MessageKind::Error);
    }
}
