use crate::errors::{InspectorError, Result};
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// A decoded image, read-only once built. Clones share the pixel buffer.
#[derive(Clone)]
pub struct PixelSource {
    image: Arc<RgbaImage>,
}

impl std::fmt::Debug for PixelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSource")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PixelSource {
    pub fn new(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(InspectorError::EmptyImage { width, height });
        }
        Ok(Self { image: Arc::new(image) })
    }

    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Self::new(image.to_rgba8())
    }

    /// Uniform-color image, handy for placeholders and fixtures.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Panics when out of bounds, like `ImageBuffer::get_pixel`.
    pub fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Sample with wrap-around on both axes, for infinitely repeating fills.
    pub fn sample_wrapped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.rem_euclid(self.width() as i64) as u32;
        let y = y.rem_euclid(self.height() as i64) as u32;
        self.sample(x, y)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}
