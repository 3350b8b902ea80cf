use crate::app::TileInspectorApp;
use egui::{self, Color32, Pos2, Rect};
use tile_inspector::{PreviewStatus, RenderMode};

impl TileInspectorApp {
    pub(crate) fn render_main_view(&mut self, ctx: &egui::Context) {
        let [r, g, b] = self.inspector.settings().background_color;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::from_rgb(r, g, b)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

                self.handle_canvas_input(ctx, rect, response.hovered());

                let ppp = ctx.pixels_per_point();
                let width = (rect.width() * ppp).round().max(0.0) as u32;
                let height = (rect.height() * ppp).round().max(0.0) as u32;
                if let Some(frame) = self.inspector.render_if_dirty(width, height) {
                    self.upload_frame(ctx, frame);
                }

                if let Some(texture) = &self.frame_texture {
                    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                    ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
                }

                self.paint_hints(ui, rect);
            });
    }

    fn paint_hints(&self, ui: &egui::Ui, rect: Rect) {
        let text = match self.inspector.mode() {
            RenderMode::PhotoPreview => match self.inspector.preview_status() {
                PreviewStatus::Loading | PreviewStatus::Inactive => Some("Loading preview…"),
                PreviewStatus::Failed(_) => Some("Preview unavailable"),
                PreviewStatus::Ready => None,
            },
            RenderMode::TileView if self.inspector.texture().is_none() => {
                if self.inspector.is_loading_texture() {
                    Some("Loading…")
                } else {
                    Some("Open a texture (O) or drop an image here")
                }
            }
            RenderMode::TileView => None,
        };

        if let Some(text) = text {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(16.0),
                Color32::from_gray(170),
            );
        }
    }
}
