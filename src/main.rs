mod app;
mod ui;

use app::TileInspectorApp;
use eframe::egui;
use std::path::PathBuf;
use tile_inspector::logging;
use tile_inspector::Settings;

fn main() -> anyhow::Result<()> {
    logging::init_tracing(logging::debug_requested());

    let settings = Settings::load();
    let initial_texture = std::env::args_os().nth(1).map(PathBuf::from);
    log::info!("Starting tile inspector (initial texture: {:?})", initial_texture);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([480.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Tile Inspector",
        native_options,
        Box::new(move |cc| Ok(Box::new(TileInspectorApp::new(cc, settings, initial_texture)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the window: {}", e))
}
