use crate::app::TileInspectorApp;

impl eframe::App for TileInspectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Finished background decodes
        let previous_error = self.inspector.last_error().map(str::to_string);
        if self.inspector.poll_assets() {
            let error = self.inspector.last_error().map(str::to_string);
            if let Some(error) = error.filter(|e| Some(e) != previous_error.as_ref()) {
                self.set_status_message(error);
            }
        }

        self.handle_keyboard(ctx);
        self.handle_dropped_files(ctx);

        self.render_toolbar(ctx);
        self.render_statusbar(ctx);
        self.render_main_view(ctx);
    }
}
