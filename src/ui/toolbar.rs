use crate::app::TileInspectorApp;
use egui::{self, Color32, Margin, RichText, Vec2};
use tile_inspector::RenderMode;

impl TileInspectorApp {
    pub fn render_toolbar(&mut self, ctx: &egui::Context) {
        let tiles = self.inspector.tiles();
        let max_tiles = self.inspector.settings().max_tiles;
        let show_seams = self.inspector.show_seams();
        let previewing = self.inspector.mode() == RenderMode::PhotoPreview;

        // Collect actions to perform after UI
        let mut open_file = false;
        let mut reset_view = false;
        let mut toggle_seams = false;
        let mut toggle_preview = false;
        let mut rotate = 0.0f32;
        let mut new_tiles: Option<u32> = None;

        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::NONE
                    .fill(Color32::from_rgb(28, 28, 32))
                    .inner_margin(Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);

                    if ui.button("Open…").on_hover_text("Open texture (O)").clicked() {
                        open_file = true;
                    }

                    ui.add_space(8.0);
                    ui.label(RichText::new("Tiles").color(Color32::GRAY).size(11.0));
                    let mut value = tiles;
                    if ui
                        .add(egui::Slider::new(&mut value, 1..=max_tiles.max(1)))
                        .on_hover_text("Tiles per axis (1-9)")
                        .changed()
                    {
                        new_tiles = Some(value);
                    }

                    ui.add_space(8.0);
                    if ui.selectable_label(show_seams, "Seams").on_hover_text("Seam overlay (E)").clicked() {
                        toggle_seams = true;
                    }
                    if ui
                        .selectable_label(previewing, "Photo preview")
                        .on_hover_text("Preview on reference photo (P)")
                        .clicked()
                    {
                        toggle_preview = true;
                    }

                    ui.add_space(8.0);
                    if ui.button("⟲").on_hover_text("Rotate left (,)").clicked() {
                        rotate -= 1.0;
                    }
                    if ui.button("⟳").on_hover_text("Rotate right (.)").clicked() {
                        rotate += 1.0;
                    }
                    if ui.button("Reset").on_hover_text("Reset view (R)").clicked() {
                        reset_view = true;
                    }
                });
            });

        if let Some(tiles) = new_tiles {
            if let Err(e) = self.inspector.set_tiles(tiles) {
                self.set_status_message(e.user_message());
            }
        }
        if toggle_seams {
            self.inspector.toggle_seams();
        }
        if toggle_preview {
            self.inspector.toggle_preview();
        }
        if rotate != 0.0 {
            self.inspector.rotate_step(rotate);
        }
        if reset_view {
            self.inspector.reset_view();
        }
        if open_file {
            self.open_file_dialog();
        }
    }
}
