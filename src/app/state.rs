use eframe::egui::{self, TextureHandle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tile_inspector::{Inspector, Settings};

/// Desktop shell around [`Inspector`]. Owns the GPU texture the rendered
/// frame is uploaded to and a few bits of UI-only state.
pub struct TileInspectorApp {
    pub inspector: Inspector,

    /// Last rendered frame, re-uploaded only when the inspector repaints.
    pub frame_texture: Option<TextureHandle>,

    /// Touch ids currently on the surface. While non-empty, egui's
    /// synthesized mouse events are ignored so a finger is not counted twice.
    pub active_touches: Vec<u64>,
    pub mouse_down: bool,

    pub status_message: Option<(String, Instant)>,
}

impl TileInspectorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, initial_texture: Option<PathBuf>) -> Self {
        let mut inspector = Inspector::new(settings);

        let ctx = cc.egui_ctx.clone();
        inspector.set_waker(Arc::new(move || ctx.request_repaint()));

        let mut app = Self {
            inspector,
            frame_texture: None,
            active_touches: Vec::new(),
            mouse_down: false,
            status_message: None,
        };

        if let Some(path) = initial_texture {
            app.load_texture_file(path);
        }
        app
    }

    pub fn set_status_message(&mut self, message: String) {
        log::info!("{}", message);
        self.status_message = Some((message, Instant::now()));
    }

    /// Uploads `frame` to the GPU, reusing the existing texture when possible.
    pub fn upload_frame(&mut self, ctx: &egui::Context, frame: image::RgbaImage) {
        let size = [frame.width() as usize, frame.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());

        match &mut self.frame_texture {
            Some(handle) => handle.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.frame_texture = Some(ctx.load_texture("inspector-frame", color_image, egui::TextureOptions::NEAREST));
            }
        }
    }
}
