use super::TileInspectorApp;
use eframe::egui;
use std::path::PathBuf;
use tile_inspector::image_loader::{is_supported_image, SUPPORTED_EXTENSIONS};

impl TileInspectorApp {
    pub fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            self.load_texture_file(path);
        }
    }

    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            if let Some(path) = &file.path {
                if path.is_file() && is_supported_image(path) {
                    self.load_texture_file(path.clone());
                    break;
                }
                self.set_status_message(format!("Unsupported file: {}", path.display()));
            }
        }
    }

    pub fn load_texture_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.set_status_message(format!("Loading {}", name));
        self.inspector.open_texture(path);
    }
}
