//! Dashboard application entry point

use anyhow::{anyhow, Result};
use eframe::egui;
use egui::RichText;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::api::HttpOcrService;
use crate::app::OcrWorker;
use crate::config::AppConfig;
use crate::dashboard::components::{render_header, render_notification};
use crate::dashboard::state::{
    DashboardState, ProcessedImage, ServiceStatus, UiAction,
};
use crate::dashboard::theme::{color_with_alpha, Theme};
use crate::dashboard::views::{render_result_view, render_upload_view};
use crate::shared::{RequestLifecycle, Severity, WorkerEvent};
use crate::storage::{ExportKind, Exporter};
use crate::upload::{StagedFile, ACCEPTED_EXTENSIONS};
use crate::vision::annotate;

/// The main dashboard application
pub struct DashboardApp {
    /// Dashboard-specific state
    state: DashboardState,
    /// Colours and spacing handed to every view
    theme: Theme,
    /// Whether theme has been applied
    theme_applied: bool,
    /// Background request worker
    worker: OcrWorker,
    exporter: Exporter,
    config: AppConfig,
}

impl DashboardApp {
    /// Create a new dashboard application, staging `files` right away
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        theme: Theme,
        files: Vec<PathBuf>,
    ) -> Result<Self> {
        let service = HttpOcrService::new(&config.server.base_url, config.server.timeout())?;
        let repaint_ctx = cc.egui_ctx.clone();
        let worker = OcrWorker::spawn(
            Arc::new(service),
            Arc::new(move || repaint_ctx.request_repaint()),
        )?;

        let exporter = Exporter::new(
            config.export.resolved_directory(),
            config.export.pretty_json,
        );
        info!("Exports go to {:?}", exporter.dir());

        let mut state = DashboardState::default();
        state.result_view.zoom = config.ui.zoom();

        if !files.is_empty() {
            if let Err(e) = state.session.stage_paths(&files) {
                error!("Could not stage command line files: {}", e);
            }
        }

        if config.server.check_health_on_start {
            state.service = ServiceStatus::Checking;
            worker.check_health();
        }

        Ok(Self {
            state,
            theme,
            theme_applied: false,
            worker,
            exporter,
            config,
        })
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 820.0])
                .with_min_inner_size([720.0, 520.0])
                .with_drag_and_drop(true)
                .with_title("OCR Scanner"),
            ..Default::default()
        }
    }

    /// Apply everything the worker finished since the last frame
    fn process_events(&mut self) {
        for event in self.worker.drain_events() {
            match event {
                WorkerEvent::Completed { id, outcome } => {
                    if !self.state.session.complete(id, outcome) {
                        continue;
                    }
                    match self.state.session.result() {
                        Some(result) => {
                            if let Some(location) =
                                self.state.result_view.begin(result, id, self.config.ui.zoom())
                            {
                                self.worker.fetch_image(id, location);
                            }
                        }
                        None => self.state.result_view.clear(),
                    }
                }
                WorkerEvent::Health(outcome) => {
                    self.state.service = ServiceStatus::from_outcome(outcome);
                    debug!("Service status: {:?}", self.state.service);
                }
                WorkerEvent::ImageFetched {
                    request,
                    location,
                    outcome,
                } => {
                    self.state
                        .result_view
                        .image_arrived(request, &location, outcome);
                }
            }
        }
    }

    /// Stage files dropped onto the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone())
        });
        self.state.upload_view.drag_hover = hovering;

        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        let mut in_memory = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                in_memory.push(StagedFile::from_bytes(file.name, bytes));
            }
        }

        let outcome = if !paths.is_empty() {
            self.state.session.stage_paths(&paths)
        } else {
            self.state.session.stage_files(in_memory)
        };
        if let Err(e) = outcome {
            debug!("Drop ignored: {}", e);
        }
    }

    /// Handle actions queued by the views this frame
    fn process_actions(&mut self, ctx: &egui::Context) {
        let actions = std::mem::take(&mut self.state.actions);
        let mut picked = false;

        for action in actions {
            match action {
                UiAction::PickFiles => {
                    if picked || self.state.session.is_busy() {
                        continue;
                    }
                    picked = true;
                    if let Some(paths) = rfd::FileDialog::new()
                        .set_title("Select images")
                        .add_filter("Images", &ACCEPTED_EXTENSIONS)
                        .pick_files()
                    {
                        if let Err(e) = self.state.session.stage_paths(&paths) {
                            debug!("Pick ignored: {}", e);
                        }
                    }
                }
                UiAction::RemoveFile(index) => {
                    if let Err(e) = self.state.session.remove_file(index) {
                        debug!("Remove ignored: {}", e);
                    }
                }
                UiAction::ClearAll => {
                    if self.state.session.clear().is_ok() {
                        self.state.result_view.clear();
                        self.state.result_view.zoom = self.config.ui.zoom();
                    }
                }
                UiAction::Submit => match self.state.session.submit() {
                    Ok(ticket) => self.worker.submit(ticket),
                    Err(e) => debug!("Submit rejected: {}", e),
                },
                UiAction::Cancel => {
                    if let Some(id) = self.state.session.cancel() {
                        self.worker.cancel(id);
                    }
                }
                UiAction::DismissError => self.state.session.dismiss_error(),
                UiAction::DismissNotification => self.state.session.dismiss_notification(),
                UiAction::CopyText => {
                    if let Some(result) = self.state.session.result() {
                        ctx.copy_text(result.text().to_string());
                        self.state
                            .session
                            .notify(Severity::Info, "Text copied to clipboard");
                    }
                }
                UiAction::Export(kind) => self.export(kind),
                UiAction::CheckHealth => {
                    self.state.service = ServiceStatus::Checking;
                    self.worker.check_health();
                }
            }
        }
    }

    /// Write the current result to the export directory
    fn export(&mut self, kind: ExportKind) {
        let Some(result) = self.state.session.result() else {
            return;
        };
        let millis = chrono::Utc::now().timestamp_millis();

        let outcome = match kind {
            ExportKind::Text => self.exporter.write_text(result, millis),
            ExportKind::Json => self.exporter.write_json(result, millis),
            ExportKind::AnnotatedImage => match &self.state.result_view.processed {
                ProcessedImage::Ready { bytes, .. } => annotate(bytes, result.overlay_boxes())
                    .and_then(|image| self.exporter.write_annotated(&image, millis)),
                _ => Err(anyhow!("The processed image is not available")),
            },
        };

        match outcome {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.state
                    .session
                    .notify(Severity::Success, format!("Saved {}", name));
            }
            Err(e) => {
                error!("Export failed: {:#}", e);
                self.state
                    .session
                    .notify(Severity::Error, format!("Export failed: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            self.theme.apply(ctx);
            self.theme_applied = true;
        }

        self.process_events();
        self.handle_dropped_files(ctx);

        self.state
            .session
            .expire_notification(Instant::now(), self.config.ui.notification_ttl());
        if self.state.session.notification().is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let theme = &self.theme;
        let server_url = self.config.server.base_url.as_str();
        let export_dir = self.exporter.dir().display().to_string();
        let DashboardState {
            session,
            upload_view,
            result_view,
            service,
            actions,
        } = &mut self.state;

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(theme.palette.paper)
                    .inner_margin(egui::Margin::symmetric(24.0, 4.0)),
            )
            .show(ctx, |ui| {
                render_header(ui, theme, service, server_url, actions);
            });

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::none()
                    .fill(theme.palette.paper)
                    .inner_margin(egui::Margin::symmetric(24.0, 6.0)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Exports are saved to {}", export_dir))
                        .size(12.0)
                        .color(theme.palette.text_muted),
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    egui::Frame::none().inner_margin(24.0).show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.heading(RichText::new("Extract Text from Images").size(28.0));
                            ui.label(
                                RichText::new(
                                    "Upload an image and extract text using Optical Character Recognition (OCR)",
                                )
                                .color(theme.palette.text_secondary),
                            );
                        });
                        ui.add_space(theme.section_spacing);

                        if let RequestLifecycle::Submitting {
                            file_count,
                            started,
                            ..
                        } = session.request()
                        {
                            render_progress(ui, theme, *file_count, started.elapsed(), actions);
                            ui.add_space(theme.section_spacing);
                        }

                        render_upload_view(ui, theme, session, upload_view, actions);

                        if let Some(err) = session.error() {
                            ui.add_space(theme.section_spacing);
                            render_error(ui, theme, &err.to_string(), actions);
                        }

                        if let Some(result) = session.result() {
                            ui.add_space(theme.section_spacing);
                            render_result_view(ui, theme, result, result_view, actions);
                        }
                    });
                });
        });

        if let Some(notification) = session.notification() {
            render_notification(ctx, theme, notification, actions);
        }

        self.process_actions(ctx);
    }
}

fn render_progress(
    ui: &mut egui::Ui,
    theme: &Theme,
    file_count: usize,
    elapsed: Duration,
    actions: &mut Vec<UiAction>,
) {
    ui.vertical_centered(|ui| {
        ui.add(egui::Spinner::new().size(36.0).color(theme.palette.primary));
        ui.label(format!(
            "Processing {} file(s)... {}s",
            file_count,
            elapsed.as_secs()
        ));
        if ui.button("Cancel").clicked() {
            actions.push(UiAction::Cancel);
        }
    });
}

fn render_error(ui: &mut egui::Ui, theme: &Theme, message: &str, actions: &mut Vec<UiAction>) {
    egui::Frame::none()
        .fill(color_with_alpha(theme.palette.error, 30))
        .stroke(egui::Stroke::new(1.0, theme.palette.error))
        .rounding(egui::Rounding::same(theme.rounding * 0.5))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(theme.palette.error));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        actions.push(UiAction::DismissError);
                    }
                });
            });
        });
}

/// Run the dashboard application
pub fn run_dashboard(
    config: AppConfig,
    theme: Theme,
    files: Vec<PathBuf>,
) -> Result<(), eframe::Error> {
    eframe::run_native(
        "OCR Scanner",
        DashboardApp::options(),
        Box::new(move |cc| {
            let app = DashboardApp::new(cc, config, theme, files)?;
            Ok(Box::new(app))
        }),
    )
}
