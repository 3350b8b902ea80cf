//! Texture tile inspector: repeats a texture in an N×N grid to expose seams,
//! and previews it masked onto a reference photo.

pub mod assets;
pub mod compositor;
pub mod errors;
pub mod gesture;
pub mod image_loader;
pub mod inspector;
pub mod logging;
pub mod mask;
pub mod renderer;
pub mod settings;
pub mod viewport;

pub use errors::{InspectorError, Result};
pub use gesture::{GestureRouter, GestureState, InputEvent};
pub use image_loader::{PixelSource, SeamOverlay};
pub use inspector::{Inspector, PreviewStatus};
pub use renderer::RenderMode;
pub use settings::Settings;
pub use viewport::{Point, ViewState};
