use crate::app::TileInspectorApp;
use egui::{self, Color32, Margin, RichText};
use tile_inspector::{GestureState, PreviewStatus, RenderMode};

impl TileInspectorApp {
    pub(crate) fn render_statusbar(&mut self, ctx: &egui::Context) {
        let view = self.inspector.view();

        egui::TopBottomPanel::bottom("statusbar")
            .frame(
                egui::Frame::NONE
                    .fill(Color32::from_rgb(25, 25, 28))
                    .inner_margin(Margin::symmetric(12, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    // Texture info
                    if let Some(path) = self.inspector.texture_path() {
                        let filename = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default();
                        ui.label(RichText::new(&filename).color(Color32::WHITE).size(12.0));
                    }
                    if let Some(texture) = self.inspector.texture() {
                        ui.label(
                            RichText::new(format!("{}×{}", texture.width(), texture.height()))
                                .color(Color32::GRAY)
                                .size(11.0),
                        );
                    }
                    if self.inspector.is_loading_texture() {
                        ui.label(RichText::new("[Loading]").color(Color32::from_rgb(255, 200, 100)).size(11.0));
                    }

                    ui.separator();
                    ui.label(
                        RichText::new(format!(
                            "{:.0}%  {:.1}°  {}×{}",
                            view.scale * 100.0,
                            view.rotation.to_degrees(),
                            self.inspector.tiles(),
                            self.inspector.tiles()
                        ))
                        .color(Color32::GRAY)
                        .size(11.0),
                    );

                    if self.inspector.show_seams() {
                        if let Some(seams) = self.inspector.seam_overlay() {
                            let stats = seams.stats();
                            ui.label(
                                RichText::new(format!(
                                    "seams: worst L/R {} T/B {}",
                                    stats.worst_vertical, stats.worst_horizontal
                                ))
                                .color(Color32::GRAY)
                                .size(11.0),
                            );
                        }
                    }

                    if self.inspector.mode() == RenderMode::PhotoPreview {
                        match self.inspector.preview_status() {
                            PreviewStatus::Failed(message) => {
                                ui.label(
                                    RichText::new(format!("Preview unavailable: {}", message))
                                        .color(Color32::from_rgb(230, 90, 90))
                                        .size(11.0),
                                );
                            }
                            PreviewStatus::Ready => {
                                ui.label(
                                    RichText::new(format!("regions: {}", self.inspector.preview_regions().join(", ")))
                                        .color(Color32::GRAY)
                                        .size(11.0),
                                );
                            }
                            PreviewStatus::Loading | PreviewStatus::Inactive => {}
                        }
                    }

                    match self.inspector.gesture_state() {
                        GestureState::Panning { .. } => {
                            ui.label(RichText::new("[Pan]").color(Color32::GRAY).size(11.0));
                        }
                        GestureState::PinchTwisting { .. } => {
                            ui.label(RichText::new("[Pinch]").color(Color32::GRAY).size(11.0));
                        }
                        GestureState::Idle => {}
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some((msg, time)) = &self.status_message {
                            if time.elapsed().as_secs() < 3 {
                                ui.label(
                                    RichText::new(msg)
                                        .color(Color32::from_rgb(100, 200, 100))
                                        .size(11.0),
                                );
                            }
                        }
                    });
                });
            });
    }
}
