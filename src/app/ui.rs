use super::{FielerApp, SharePhase};
use crate::share::RenderedCode;
use crate::upload::ShareResult;
use crate::utils::file_size::FileSizeUtils;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use tracing::warn;

const ACCENT: Color32 = Color32::from_rgb(250, 204, 21);
const LINK: Color32 = Color32::from_rgb(59, 130, 246);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);

impl FielerApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let footer_height = 40.0;
            let content_height = ui.available_height() - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Share Files with Ease");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Fast, secure, and simple file sharing for everyone")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_intake(ui);

                    if !self.state.staging().is_empty() {
                        ui.add_space(15.0);
                        self.render_staged(ui);
                        ui.add_space(10.0);
                        self.render_share_button(ui);
                    }

                    ui.add_space(20.0);
                    self.render_result(ui);
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(10.0);
                self.render_footer(ui);
            });
        });
    }

    fn render_intake(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.label(if hovering {
                    "Drop the files here..."
                } else {
                    "Drag & drop files here, or pick them below"
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("📄 Add Files").clicked() {
                        let extensions = self.intake.extensions();
                        if let Some(paths) = FileDialog::new()
                            .add_filter("Images, PDF and text", extensions.as_slice())
                            .pick_files()
                        {
                            self.stage_paths(paths);
                        }
                    }
                    if ui.button("📁 Add Folder").clicked() {
                        if let Some(folder) = FileDialog::new().pick_folder() {
                            self.stage_folder(folder);
                        }
                    }
                });
                ui.add_space(10.0);
            });
        });
    }

    fn render_staged(&mut self, ui: &mut egui::Ui) {
        let mut remove = None;

        egui::ScrollArea::vertical()
            .id_source("staged-files")
            .max_height(200.0)
            .show(ui, |ui| {
                for (index, file) in self.state.staging().files().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "{}) {} ({})",
                            index + 1,
                            file.name(),
                            FileSizeUtils::format_kilobytes(file.byte_size())
                        ));
                        if ui.button("❌").clicked() {
                            remove = Some(index);
                        }
                    });
                }
            });

        if let Some(index) = remove {
            self.remove_file(index);
        }
    }

    fn render_share_button(&mut self, ui: &mut egui::Ui) {
        let submitting = self.state.is_submitting();

        ui.vertical_centered(|ui| {
            let label = if submitting {
                "⏳ Sharing..."
            } else {
                "Share Files Online"
            };
            let button = egui::Button::new(RichText::new(label).strong())
                .min_size(egui::vec2(200.0, 40.0));

            if ui.add_enabled(!submitting, button).clicked() {
                let ctx = ui.ctx().clone();
                self.share_files(&ctx);
            }
            if submitting {
                ui.spinner();
            }
        });
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        let heading = match self.state.result() {
            ShareResult::None => return,
            ShareResult::Single { .. } => "Download Link:",
            ShareResult::Batch { .. } => "Download All Files:",
        };
        let Some(link) = self.link.as_mut() else {
            return;
        };

        if link.texture.is_none() {
            let image = code_image(&link.presentation.code);
            link.texture = Some(ui.ctx().load_texture(
                "share-code",
                image,
                egui::TextureOptions::NEAREST,
            ));
        }

        let url = link.presentation.text.clone();
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(heading).strong());
            let response = ui.add(
                egui::Label::new(RichText::new(&url).underline().color(LINK))
                    .sense(egui::Sense::click()),
            );
            if response.on_hover_text("Open in browser").clicked() {
                if let Err(e) = open::that(&url) {
                    warn!(error = %e, "Failed to open link");
                }
            }
            if ui.small_button("📋 Copy").clicked() {
                ui.output_mut(|o| o.copied_text = url.clone());
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Or Scan the QR Code:").strong());
            if let Some(texture) = &link.texture {
                let side = link.presentation.code.size() as f32;
                ui.add(egui::Image::new(egui::load::SizedTexture::new(
                    texture.id(),
                    egui::vec2(side, side),
                )));
            }
        });
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        let message = self
            .state
            .notice()
            .map(str::to_string)
            .or_else(|| self.render_error.clone());

        if let Some(message) = message {
            ui.horizontal(|ui| {
                ui.colored_label(ERROR, message);
                if ui.small_button("Dismiss").clicked() {
                    self.dismiss_notice();
                }
            });
        } else if self.state.phase() == SharePhase::Submitting {
            ui.colored_label(ACCENT, "Uploading...");
        }
    }
}

fn code_image(code: &RenderedCode) -> egui::ColorImage {
    let side = code.size() as usize;
    let pixels = code
        .pixels()
        .into_iter()
        .map(|dark| if dark { Color32::BLACK } else { Color32::WHITE })
        .collect();

    egui::ColorImage {
        size: [side, side],
        pixels,
    }
}
