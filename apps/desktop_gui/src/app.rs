use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Result;
use client_core::{
    ClientSettings, Distribution, FileCandidate, HttpAnalysisService, RequestOrchestrator,
    Session, SessionEvent, SubmitOutcome,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use shared::domain::{Epoch, MessageKind, ViewKind};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    artifacts::{spawn_artifact_fetch, spawn_preview_decode, GuiEvent, PreviewImage},
    backend::{spawn_backend_thread, Backend},
};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

enum ImageSlot {
    Loading,
    Ready(egui::TextureHandle),
    Failed(String),
}

pub struct PixelTypeApp {
    backend: Backend,
    base_url: String,
    orchestrator: RequestOrchestrator,
    session_rx: UnboundedReceiver<SessionEvent>,
    session: Session,
    ui_tx: Sender<GuiEvent>,
    ui_rx: Receiver<GuiEvent>,
    preview_generation: u64,
    preview: Option<ImageSlot>,
    artifacts_epoch: Option<Epoch>,
    artifacts: HashMap<ViewKind, ImageSlot>,
}

impl PixelTypeApp {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let backend = spawn_backend_thread()?;
        let service = Arc::new(HttpAnalysisService::new(settings.clone())?);
        let base_url = settings.base_url.clone();
        let (orchestrator, session_rx) =
            RequestOrchestrator::new(service, settings, backend.handle());
        let (ui_tx, ui_rx) = bounded::<GuiEvent>(64);
        tracing::info!(base_url = %base_url, "desktop client ready");

        Ok(Self {
            backend,
            base_url,
            orchestrator,
            session_rx,
            session: Session::new(),
            ui_tx,
            ui_rx,
            preview_generation: 0,
            preview: None,
            artifacts_epoch: None,
            artifacts: HashMap::new(),
        })
    }

    fn process_session_events(&mut self) {
        while let Ok(event) = self.session_rx.try_recv() {
            self.orchestrator.handle_event(&mut self.session, event);
        }
    }

    fn process_gui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                GuiEvent::PreviewDecoded { generation, image }
                    if generation == self.preview_generation =>
                {
                    let texture = load_texture(ctx, format!("preview:{generation}"), &image);
                    self.preview = Some(ImageSlot::Ready(texture));
                }
                GuiEvent::PreviewFailed { generation, reason }
                    if generation == self.preview_generation =>
                {
                    tracing::debug!("preview unavailable: {reason}");
                    self.preview = Some(ImageSlot::Failed(reason));
                }
                GuiEvent::ArtifactLoaded { epoch, view, image }
                    if Some(epoch) == self.artifacts_epoch =>
                {
                    let name = format!("artifact:{}:{}", epoch.0, view.as_str());
                    let texture = load_texture(ctx, name, &image);
                    self.artifacts.insert(view, ImageSlot::Ready(texture));
                }
                GuiEvent::ArtifactFailed {
                    epoch,
                    view,
                    reason,
                } if Some(epoch) == self.artifacts_epoch => {
                    tracing::warn!(view = view.as_str(), "artifact download failed: {reason}");
                    self.artifacts.insert(view, ImageSlot::Failed(reason));
                }
                _ => tracing::debug!("discarding stale image event"),
            }
        }
    }

    fn request_artifacts(&mut self, ctx: &egui::Context) {
        let epoch = self.session.epoch();
        if self.artifacts_epoch == Some(epoch) {
            return;
        }
        let Some(result) = self.session.result() else {
            return;
        };

        self.artifacts_epoch = Some(epoch);
        self.artifacts.clear();
        let runtime = self.backend.handle();
        for (view, url) in result.images.iter() {
            self.artifacts.insert(view, ImageSlot::Loading);
            spawn_artifact_fetch(
                &runtime,
                self.orchestrator.service(),
                epoch,
                view,
                url.to_string(),
                self.ui_tx.clone(),
                ctx.clone(),
            );
        }
    }

    fn stage(&mut self, ctx: &egui::Context, candidate: FileCandidate, dropped: bool) {
        let outcome = if dropped {
            self.session.drop_file(candidate)
        } else {
            self.session.select_file(candidate)
        };
        // Rejections are already on the message banner.
        if outcome.is_err() {
            return;
        }
        let Some(file) = self.session.selected_file() else {
            return;
        };

        self.preview_generation = self.preview_generation.wrapping_add(1);
        self.preview = Some(ImageSlot::Loading);
        spawn_preview_decode(
            &self.backend.handle(),
            self.preview_generation,
            Arc::from(file.bytes()),
            self.ui_tx.clone(),
            ctx.clone(),
        );
    }

    fn pick_file(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        match FileCandidate::from_path(&path) {
            Ok(candidate) => self.stage(ctx, candidate, false),
            Err(err) => self
                .session
                .show_message(format!("{err:#}"), MessageKind::Error),
        }
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|input| {
            (
                !input.raw.hovered_files.is_empty(),
                input.raw.dropped_files.clone(),
            )
        });

        if hovering && !self.session.intake().is_drag_active() {
            self.session.drag_over();
        } else if !hovering && dropped.is_empty() && self.session.intake().is_drag_active() {
            self.session.drag_leave();
        }

        // Only the first file of a multi-file drop is considered.
        let Some(file) = dropped.first() else {
            return;
        };
        match candidate_from_drop(file) {
            Ok(Some(candidate)) => self.stage(ctx, candidate, true),
            Ok(None) => self.session.drag_leave(),
            Err(err) => {
                self.session.drag_leave();
                self.session
                    .show_message(format!("{err:#}"), MessageKind::Error);
            }
        }
    }

    fn submit(&mut self) {
        match self.orchestrator.submit(&mut self.session) {
            Ok(SubmitOutcome::Started(_)) => {
                self.artifacts_epoch = None;
                self.artifacts.clear();
            }
            Ok(SubmitOutcome::Ignored) => {}
            Err(err) => tracing::debug!("submit rejected: {err}"),
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("PixelPerfect Type");
                ui.label(egui::RichText::new(&self.base_url).weak());
            });
        });
    }

    fn show_message_banner(&self, ctx: &egui::Context) {
        let Some(message) = self.session.message() else {
            return;
        };
        egui::TopBottomPanel::bottom("message_banner").show(ctx, |ui| {
            ui.colored_label(message_color(message.kind), &message.text);
        });
    }

    fn show_intake_panel(&mut self, ctx: &egui::Context) {
        let mut pick = false;
        let mut submit = false;
        let mut cancel = false;

        egui::SidePanel::left("intake_panel")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                let highlight = if self.session.intake().is_drag_active() {
                    ui.visuals().selection.stroke.color
                } else {
                    ui.visuals().widgets.noninteractive.bg_stroke.color
                };
                egui::Frame::group(ui.style())
                    .stroke(egui::Stroke::new(2.0, highlight))
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.vertical_centered(|ui| {
                            ui.label("Drop a UI screenshot here");
                            pick = ui.button("Choose image...").clicked();
                        });
                    });

                ui.add_space(8.0);
                if let Some(file) = self.session.selected_file() {
                    ui.label(egui::RichText::new(file.name()).strong());
                    ui.label(
                        egui::RichText::new(format!(
                            "{} · {}",
                            file.content_type(),
                            format_bytes(file.len())
                        ))
                        .weak(),
                    );
                    if !self.session.results_visible() {
                        show_image_slot(ui, self.preview.as_ref());
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    submit = ui
                        .add_enabled(self.session.submit_enabled(), egui::Button::new("Analyze"))
                        .clicked();
                    if self.session.progress_visible() {
                        cancel = ui.button("Cancel").clicked();
                    }
                });

                if self.session.progress_visible() {
                    let state = self.session.state();
                    let percent = state.percent().unwrap_or_default();
                    let label = state.label().unwrap_or("Uploading...");
                    ui.add(
                        egui::ProgressBar::new(f32::from(percent) / 100.0)
                            .text(format!("{percent}% {label}"))
                            .animate(true),
                    );
                }
            });

        if pick {
            self.pick_file(ctx);
        }
        if submit {
            self.submit();
        }
        if cancel {
            self.orchestrator.cancel(&mut self.session);
        }
    }

    fn show_results(&mut self, ctx: &egui::Context) {
        let mut selected = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.session.results_visible() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Choose an image and press Analyze to measure its text.")
                            .weak(),
                    );
                });
                return;
            }

            let current = self.session.view().active_view();
            let mut tab = current;
            ui.horizontal(|ui| {
                for view in ViewKind::ALL {
                    ui.selectable_value(&mut tab, view, view.title());
                }
            });
            if tab != current {
                selected = Some(tab);
            }
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                let active = self.session.view().active_view();
                let artifact = self.artifacts.get(&active);
                let slot = match (active, artifact) {
                    (ViewKind::Normalized, None | Some(ImageSlot::Loading)) => {
                        self.preview.as_ref().or(artifact)
                    }
                    _ => artifact,
                };
                show_image_slot(ui, slot);

                ui.add_space(12.0);
                ui.heading("Statistics");
                let stats = self.session.stats().unwrap_or_default();
                egui::Grid::new("stats_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for stat in &stats {
                            ui.label(stat.label);
                            ui.label(egui::RichText::new(&stat.value).strong());
                            ui.end_row();
                        }
                    });

                ui.add_space(12.0);
                ui.heading("Font size distribution");
                match self.session.distribution() {
                    None | Some(Distribution::NoData) => {
                        ui.label(egui::RichText::new("No distribution data").weak());
                    }
                    Some(Distribution::Ranked(buckets)) => {
                        for bucket in &buckets {
                            ui.horizontal(|ui| {
                                ui.label(format!("{}px", bucket.size));
                                ui.add(
                                    egui::ProgressBar::new(bucket.percentage as f32 / 100.0)
                                        .desired_width(180.0)
                                        .text(bucket.percentage_label()),
                                );
                                ui.label(format!("{} occurrences", bucket.count));
                            });
                        }
                    }
                }
            });
        });

        if let Some(view) = selected {
            self.session.select_view(view);
        }
    }
}

impl eframe::App for PixelTypeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_session_events();
        self.process_gui_events(ctx);
        self.request_artifacts(ctx);
        self.handle_drag_and_drop(ctx);

        self.show_header(ctx);
        self.show_message_banner(ctx);
        self.show_intake_panel(ctx);
        self.show_results(ctx);

        // Session timers fire on the backend runtime; poll while a submission is live.
        if self.session.progress_visible() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn show_image_slot(ui: &mut egui::Ui, slot: Option<&ImageSlot>) {
    match slot {
        Some(ImageSlot::Ready(texture)) => {
            ui.add(egui::Image::new(texture).shrink_to_fit());
        }
        Some(ImageSlot::Loading) => {
            ui.spinner();
        }
        Some(ImageSlot::Failed(reason)) => {
            ui.label(egui::RichText::new(format!("Image unavailable: {reason}")).weak());
        }
        None => {}
    }
}

fn load_texture(ctx: &egui::Context, name: String, image: &PreviewImage) -> egui::TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

fn message_color(kind: MessageKind) -> egui::Color32 {
    match kind {
        MessageKind::Info => egui::Color32::from_rgb(90, 140, 220),
        MessageKind::Success => egui::Color32::from_rgb(67, 181, 129),
        MessageKind::Error => egui::Color32::from_rgb(220, 80, 80),
    }
}

/// Builds an intake candidate from a dropped file; `None` when the drop carried no data.
fn candidate_from_drop(file: &egui::DroppedFile) -> Result<Option<FileCandidate>> {
    if let Some(path) = &file.path {
        return FileCandidate::from_path(path).map(Some);
    }
    let Some(bytes) = &file.bytes else {
        return Ok(None);
    };
    let content_type = Some(file.mime.as_str()).filter(|mime| !mime.is_empty());
    Ok(Some(FileCandidate::new(
        file.name.clone(),
        content_type,
        bytes.to_vec(),
    )))
}

fn format_bytes(len: usize) -> String {
    const KB: f64 = 1024.0;
    let len = len as f64;
    if len < KB {
        format!("{len} B")
    } else if len < KB * KB {
        format!("{:.1} KB", len / KB)
    } else {
        format!("{:.1} MB", len / (KB * KB))
    }
}
