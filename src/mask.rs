//! Region masks classified from a flat-color label image.

use crate::errors::{InspectorError, Result};
use crate::image_loader::PixelSource;
use crate::settings::RegionRule;
use image::{GrayImage, Luma};

pub const OPAQUE: u8 = 255;

/// Label pixels more transparent than this belong to no region.
const MIN_LABEL_ALPHA: u8 = 128;

/// First rule the pixel satisfies, if any.
pub fn classify_pixel(rgba: [u8; 4], rules: &[RegionRule]) -> Option<usize> {
    if rgba[3] < MIN_LABEL_ALPHA {
        return None;
    }
    rules.iter().position(|rule| {
        let idx = rule.channel.index();
        let value = rgba[idx];
        value >= rule.min_value
            && (0..3)
                .filter(|&i| i != idx)
                .all(|i| value >= rgba[i].saturating_add(rule.min_margin))
    })
}

/// One binary alpha channel per region. Channels are disjoint: a pixel is
/// opaque in at most one of them.
#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    names: Vec<String>,
    channels: Vec<GrayImage>,
}

impl Mask {
    pub fn classify(label: &PixelSource, rules: &[RegionRule]) -> Result<Self> {
        if rules.is_empty() {
            return Err(InspectorError::SettingsError {
                message: "preview needs at least one region rule".to_string(),
            });
        }

        let (width, height) = label.dimensions();
        let mut channels = vec![GrayImage::new(width, height); rules.len()];
        for (x, y, pixel) in label.as_image().enumerate_pixels() {
            if let Some(region) = classify_pixel(pixel.0, rules) {
                channels[region].put_pixel(x, y, Luma([OPAQUE]));
            }
        }

        let mask = Self {
            width,
            height,
            names: rules.iter().map(|r| r.name.clone()).collect(),
            channels,
        };
        for (i, name) in mask.names.iter().enumerate() {
            log::debug!("Mask region '{}': {} px", name, mask.pixel_count(i));
        }
        Ok(mask)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn region_count(&self) -> usize {
        self.channels.len()
    }

    pub fn region_names(&self) -> &[String] {
        &self.names
    }

    pub fn is_opaque(&self, region: usize, x: u32, y: u32) -> bool {
        self.channels[region].get_pixel(x, y)[0] == OPAQUE
    }

    pub fn pixel_count(&self, region: usize) -> usize {
        self.channels[region].pixels().filter(|p| p[0] == OPAQUE).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Channel, PreviewSettings};
    use image::{Rgba, RgbaImage};

    fn region_at(mask: &Mask, x: u32, y: u32) -> Option<usize> {
        (0..mask.region_count()).find(|&r| mask.is_opaque(r, x, y))
    }

    #[test]
    fn test_classify_pixel_by_dominant_channel() {
        let rules = PreviewSettings::default().regions;
        assert_eq!(classify_pixel([20, 200, 30, 255], &rules), Some(0));
        assert_eq!(classify_pixel([20, 30, 220, 255], &rules), Some(1));
        // Cyan: neither channel dominates by the margin
        assert_eq!(classify_pixel([0, 200, 200, 255], &rules), None);
        // Too dark
        assert_eq!(classify_pixel([0, 60, 0, 255], &rules), None);
        // Transparent label pixel
        assert_eq!(classify_pixel([0, 255, 0, 0], &rules), None);
    }

    #[test]
    fn test_overlapping_rules_first_wins() {
        let loose = RegionRule {
            name: "any-green".to_string(),
            channel: Channel::Green,
            min_value: 1,
            min_margin: 0,
            texture_offset: [0.0, 0.0],
        };
        let strict = RegionRule { name: "bright-green".to_string(), min_value: 200, ..loose.clone() };
        let rules = vec![loose, strict];

        let label = PixelSource::solid(3, 3, [0, 255, 0, 255]).unwrap();
        let mask = Mask::classify(&label, &rules).unwrap();
        assert_eq!(mask.pixel_count(0), 9);
        assert_eq!(mask.pixel_count(1), 0);
    }

    #[test]
    fn test_channels_are_binary_and_disjoint() {
        let mut img = RgbaImage::new(4, 1);
        img.put_pixel(0, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        img.put_pixel(2, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 0, Rgba([0, 180, 10, 255]));
        let label = PixelSource::new(img).unwrap();

        let mask = Mask::classify(&label, &PreviewSettings::default().regions).unwrap();
        assert_eq!(mask.region_names(), ["bottom".to_string(), "top".to_string()]);
        assert_eq!(region_at(&mask, 0, 0), Some(0));
        assert_eq!(region_at(&mask, 1, 0), Some(1));
        assert_eq!(region_at(&mask, 2, 0), None);
        assert_eq!(region_at(&mask, 3, 0), Some(0));

        for x in 0..4 {
            let owners = (0..mask.region_count()).filter(|&r| mask.is_opaque(r, x, 0)).count();
            assert!(owners <= 1);
            for r in 0..mask.region_count() {
                let v = mask.channels[r].get_pixel(x, 0)[0];
                assert!(v == 0 || v == OPAQUE);
            }
        }
    }

    #[test]
    fn test_no_rules_is_error() {
        let label = PixelSource::solid(1, 1, [0, 0, 0, 255]).unwrap();
        assert!(Mask::classify(&label, &[]).is_err());
    }
}
