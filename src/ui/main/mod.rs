// Submodules for the main window
pub mod main_ui;
pub mod statusbar;
