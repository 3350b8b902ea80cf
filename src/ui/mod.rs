pub mod image_view;
pub mod main;
pub mod toolbar;
