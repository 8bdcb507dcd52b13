mod state;
mod ui;

pub use state::{ShareEffect, ShareEvent, SharePhase, ShareState};

use crate::config::AppConfig;
use crate::share::{LinkPresenter, Presentation};
use crate::staging::FileIntake;
use crate::upload::{BatchSubmission, BatchUploader, StagedFile, SubmissionOutcome};
use anyhow::{Context, Result};
use eframe::{egui, App};
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{error, info};

/// The link currently on screen, plus its texture once uploaded to the GPU.
struct PresentedLink {
    presentation: Presentation,
    texture: Option<egui::TextureHandle>,
}

pub struct FielerApp {
    state: ShareState,
    intake: FileIntake,
    uploader: BatchUploader,
    presenter: LinkPresenter,
    runtime: Runtime,
    outcome_sender: Sender<SubmissionOutcome>,
    outcome_receiver: Receiver<SubmissionOutcome>,
    link: Option<PresentedLink>,
    render_error: Option<String>,
}

impl FielerApp {
    pub fn new(config: AppConfig, runtime: Runtime) -> Result<Self> {
        info!(backend = %config.backend_url, "Initializing Fieler");
        let intake = FileIntake::new(&config.accept).context("Invalid accept pattern")?;
        let (outcome_sender, outcome_receiver) = std_mpsc::channel();

        Ok(Self {
            state: ShareState::new(config.staging),
            intake,
            uploader: BatchUploader::new(&config.backend_url),
            presenter: LinkPresenter::default(),
            runtime,
            outcome_sender,
            outcome_receiver,
            link: None,
            render_error: None,
        })
    }

    pub fn stage_files(&mut self, files: Vec<StagedFile>) {
        if files.is_empty() {
            return;
        }
        info!(count = files.len(), "Adding files to staging");
        self.state.handle(ShareEvent::Add(files));
    }

    pub fn stage_paths(&mut self, paths: Vec<PathBuf>) {
        let files = self.intake.load_paths(paths);
        self.stage_files(files);
    }

    pub fn stage_folder(&mut self, folder: PathBuf) {
        let files = self.intake.load_folder(&folder);
        self.stage_files(files);
    }

    pub fn remove_file(&mut self, index: usize) {
        self.state.handle(ShareEvent::Remove(index));
    }

    pub fn share_files(&mut self, ctx: &egui::Context) {
        if let Some(ShareEffect::Dispatch(batch)) = self.state.handle(ShareEvent::Submit) {
            self.dispatch(ctx, batch);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.state.handle(ShareEvent::Dismiss);
        self.render_error = None;
    }

    fn dispatch(&self, ctx: &egui::Context, batch: BatchSubmission) {
        let uploader = self.uploader.clone();
        let sender = self.outcome_sender.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let outcome = uploader.send(batch).await;
            if sender.send(outcome).is_err() {
                error!("Upload finished after the window closed");
            }
            ctx.request_repaint();
        });
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let files = dropped
            .iter()
            .filter_map(|file| match (&file.bytes, &file.path) {
                (Some(bytes), _) => self.intake.from_dropped(&file.name, bytes),
                (None, Some(path)) => self.intake.load_paths([path]).pop(),
                (None, None) => None,
            })
            .collect();
        self.stage_files(files);
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.collect_dropped_files(ctx);

        let mut resolved = false;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.state.handle(ShareEvent::Finished(outcome));
            resolved = true;
        }

        if resolved {
            self.refresh_link();
            ctx.request_repaint();
        }
    }

    fn refresh_link(&mut self) {
        match self.presenter.present(self.state.result()) {
            Ok(presentation) => {
                let unchanged = matches!(
                    (&self.link, &presentation),
                    (Some(current), Some(next)) if current.presentation == *next
                );
                if !unchanged {
                    self.link = presentation.map(|presentation| PresentedLink {
                        presentation,
                        texture: None,
                    });
                }
                self.render_error = None;
            }
            Err(e) => {
                error!(error = %e, "Could not render share code");
                self.link = None;
                self.render_error = Some(e.to_string());
            }
        }
    }
}

impl App for FielerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
