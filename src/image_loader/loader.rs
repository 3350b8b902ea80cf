use super::source::PixelSource;
use crate::errors::{InspectorError, Result};
use image::{DynamicImage, GenericImageView};
use std::path::Path;

const MAX_FILE_BYTES: u64 = 500 * 1024 * 1024;
const MMAP_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;
const MAX_MEGAPIXELS: u64 = 100;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "tga",
];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(InspectorError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file_size = std::fs::metadata(path)?.len();
    if file_size > MAX_FILE_BYTES {
        return Err(InspectorError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!(
                "File too large: {}MB (max {}MB)",
                file_size / (1024 * 1024),
                MAX_FILE_BYTES / (1024 * 1024)
            ),
        });
    }

    let started = std::time::Instant::now();
    let img = if file_size > MMAP_THRESHOLD_BYTES {
        load_image_memory_mapped(path)?
    } else {
        image::open(path).map_err(|e| InspectorError::ImageLoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    let (width, height) = img.dimensions();
    let megapixels = (width as u64 * height as u64) / 1_000_000;
    if megapixels > MAX_MEGAPIXELS {
        return Err(InspectorError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!("Image too large: {}MP (max {}MP)", megapixels, MAX_MEGAPIXELS),
        });
    }

    tracing::debug!(
        path = %path.display(),
        width,
        height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "decoded image"
    );
    Ok(img)
}

fn load_image_memory_mapped(path: &Path) -> Result<DynamicImage> {
    use memmap2::Mmap;
    use std::fs::File;

    let file = File::open(path)?;

    // The mapping is read-only and dropped before returning.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| InspectorError::ImageLoadError {
        path: path.to_path_buf(),
        message: format!("Memory mapping failed: {}", e),
    })?;

    image::load_from_memory(&mmap).map_err(|e| InspectorError::ImageLoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Decodes `path` straight into a [`PixelSource`].
pub fn load_pixel_source(path: &Path) -> Result<PixelSource> {
    let img = load_image(path)?;
    PixelSource::from_dynamic(&img)
}
