//! Background downloads and decoding of the images shown in the view panel.

use std::sync::Arc;

use client_core::AnalysisService;
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{Epoch, ViewKind};
use tokio::runtime::Handle;

const MAX_PREVIEW_DIMENSION: u32 = 1600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub enum GuiEvent {
    /// Local preview of the staged file; `generation` identifies the selection.
    PreviewDecoded {
        generation: u64,
        image: PreviewImage,
    },
    PreviewFailed {
        generation: u64,
        reason: String,
    },
    ArtifactLoaded {
        epoch: Epoch,
        view: ViewKind,
        image: PreviewImage,
    },
    ArtifactFailed {
        epoch: Epoch,
        view: ViewKind,
        reason: String,
    },
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(MAX_PREVIEW_DIMENSION, MAX_PREVIEW_DIMENSION)
        .to_rgba8();
    Ok(PreviewImage {
        width: resized.width() as usize,
        height: resized.height() as usize,
        rgba: resized.into_raw(),
    })
}

/// Decodes the staged bytes off the UI thread. Failures only lose the preview.
pub fn spawn_preview_decode(
    runtime: &Handle,
    generation: u64,
    bytes: Arc<[u8]>,
    ui_tx: Sender<GuiEvent>,
    ctx: egui::Context,
) {
    runtime.spawn_blocking(move || {
        let event = match decode_preview_image(&bytes) {
            Ok(image) => GuiEvent::PreviewDecoded { generation, image },
            Err(reason) => GuiEvent::PreviewFailed { generation, reason },
        };
        deliver(&ui_tx, event, &ctx);
    });
}

/// Downloads and decodes one result artifact.
pub fn spawn_artifact_fetch(
    runtime: &Handle,
    service: Arc<dyn AnalysisService>,
    epoch: Epoch,
    view: ViewKind,
    url: String,
    ui_tx: Sender<GuiEvent>,
    ctx: egui::Context,
) {
    runtime.spawn(async move {
        let event = match service.fetch_artifact(&url).await {
            Ok(bytes) => {
                match tokio::task::spawn_blocking(move || decode_preview_image(&bytes)).await {
                    Ok(Ok(image)) => GuiEvent::ArtifactLoaded { epoch, view, image },
                    Ok(Err(reason)) => GuiEvent::ArtifactFailed { epoch, view, reason },
                    Err(err) => GuiEvent::ArtifactFailed {
                        epoch,
                        view,
                        reason: err.to_string(),
                    },
                }
            }
            Err(err) => GuiEvent::ArtifactFailed {
                epoch,
                view,
                reason: err.to_string(),
            },
        };
        deliver(&ui_tx, event, &ctx);
    });
}

fn deliver(ui_tx: &Sender<GuiEvent>, event: GuiEvent, ctx: &egui::Context) {
    match ui_tx.try_send(event) {
        Ok(()) => ctx.request_repaint(),
        Err(TrySendError::Full(_)) => tracing::warn!("gui event queue full; dropping image"),
        Err(TrySendError::Disconnected(_)) => {}
    }
}
