use super::source::PixelSource;
use crate::settings::SeamSettings;

// Rec. 709 luma weights scaled by 10_000 so the threshold test is exact.
const LUMA_R: u64 = 2126;
const LUMA_G: u64 = 7152;
const LUMA_B: u64 = 722;
const LUMA_SCALE: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamAxis {
    /// Line at `x = k * width`, one segment per source row.
    Vertical,
    /// Line at `y = k * height`, one segment per source column.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeamTone {
    Light,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamColor {
    pub rgb: [u8; 3],
    pub tone: SeamTone,
    pub mean_luminance: f32,
}

/// One scanline's worth of seam, in composed-grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamSegment {
    pub axis: SeamAxis,
    /// x of a vertical seam, y of a horizontal one.
    pub position: f32,
    /// Extent along the seam: `[start, end)`.
    pub start: f32,
    pub end: f32,
    pub rgb: [u8; 3],
    pub alpha: f32,
    pub diff: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeamStats {
    pub worst_vertical: u32,
    pub worst_horizontal: u32,
    pub mean_vertical: f32,
    pub mean_horizontal: f32,
}

/// Per-scanline edge mismatch of a texture. Independent of the tile count;
/// [`SeamOverlay::segments`] replicates it across the internal seams.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamOverlay {
    width: u32,
    height: u32,
    color: SeamColor,
    row_diffs: Vec<u32>,
    column_diffs: Vec<u32>,
    row_alphas: Vec<f32>,
    column_alphas: Vec<f32>,
}

/// `|dR| + |dG| + |dB|`, 0..=765. Alpha is ignored.
pub fn channel_diff(a: [u8; 4], b: [u8; 4]) -> u32 {
    (0..3).map(|i| (a[i] as i32 - b[i] as i32).unsigned_abs()).sum()
}

/// `diff / divisor`, floored at `min_alpha` and capped at 1. Never panics,
/// even for settings that skipped validation.
pub fn seam_alpha(diff: u32, settings: &SeamSettings) -> f32 {
    let alpha = (diff as f32 / settings.diff_divisor).max(settings.min_alpha).min(1.0);
    if alpha.is_finite() {
        alpha.max(0.0)
    } else {
        1.0
    }
}

pub fn seam_color(source: &PixelSource, settings: &SeamSettings) -> SeamColor {
    let weighted: u64 = source
        .as_image()
        .pixels()
        .map(|p| LUMA_R * p[0] as u64 + LUMA_G * p[1] as u64 + LUMA_B * p[2] as u64)
        .sum();
    let count = source.width() as u64 * source.height() as u64;
    let mean_luminance = weighted as f64 / (LUMA_SCALE * count) as f64;

    if weighted < settings.luminance_threshold as u64 * LUMA_SCALE * count {
        SeamColor { rgb: settings.light_tone, tone: SeamTone::Light, mean_luminance: mean_luminance as f32 }
    } else {
        SeamColor { rgb: settings.warning_tone, tone: SeamTone::Warning, mean_luminance: mean_luminance as f32 }
    }
}

impl SeamOverlay {
    pub fn analyze(source: &PixelSource, settings: &SeamSettings) -> Self {
        let (width, height) = source.dimensions();

        // Left edge against right edge, per row
        let row_diffs: Vec<u32> = (0..height)
            .map(|y| channel_diff(source.sample(0, y), source.sample(width - 1, y)))
            .collect();
        // Top edge against bottom edge, per column
        let column_diffs: Vec<u32> = (0..width)
            .map(|x| channel_diff(source.sample(x, 0), source.sample(x, height - 1)))
            .collect();

        let row_alphas = row_diffs.iter().map(|&d| seam_alpha(d, settings)).collect();
        let column_alphas = column_diffs.iter().map(|&d| seam_alpha(d, settings)).collect();
        let color = seam_color(source, settings);

        log::debug!(
            "Seam analysis {}x{}: {:?} tone, mean luminance {:.1}",
            width,
            height,
            color.tone,
            color.mean_luminance
        );

        Self {
            width,
            height,
            color,
            row_diffs,
            column_diffs,
            row_alphas,
            column_alphas,
        }
    }

    pub fn color(&self) -> SeamColor {
        self.color
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn row_alpha(&self, y: u32) -> f32 {
        self.row_alphas[y as usize]
    }

    pub fn column_alpha(&self, x: u32) -> f32 {
        self.column_alphas[x as usize]
    }

    /// All seam segments for a `tiles x tiles` grid. Empty for a single tile.
    pub fn segments(&self, tiles: u32) -> Vec<SeamSegment> {
        let internal = tiles.saturating_sub(1) as usize;
        let mut segments =
            Vec::with_capacity(internal * (self.row_diffs.len() + self.column_diffs.len()) * tiles as usize);
        let rgb = self.color.rgb;

        for k in 1..tiles {
            let x = (k * self.width) as f32;
            for tile_row in 0..tiles {
                for (y, (&diff, &alpha)) in self.row_diffs.iter().zip(&self.row_alphas).enumerate() {
                    let start = (tile_row * self.height) as f32 + y as f32;
                    segments.push(SeamSegment {
                        axis: SeamAxis::Vertical,
                        position: x,
                        start,
                        end: start + 1.0,
                        rgb,
                        alpha,
                        diff,
                    });
                }
            }
        }

        for k in 1..tiles {
            let y = (k * self.height) as f32;
            for tile_col in 0..tiles {
                for (x, (&diff, &alpha)) in self.column_diffs.iter().zip(&self.column_alphas).enumerate() {
                    let start = (tile_col * self.width) as f32 + x as f32;
                    segments.push(SeamSegment {
                        axis: SeamAxis::Horizontal,
                        position: y,
                        start,
                        end: start + 1.0,
                        rgb,
                        alpha,
                        diff,
                    });
                }
            }
        }

        segments
    }

    pub fn stats(&self) -> SeamStats {
        let mean = |v: &[u32]| {
            if v.is_empty() {
                0.0
            } else {
                v.iter().map(|&d| d as f32).sum::<f32>() / v.len() as f32
            }
        };
        SeamStats {
            worst_vertical: self.row_diffs.iter().copied().max().unwrap_or(0),
            worst_horizontal: self.column_diffs.iter().copied().max().unwrap_or(0),
            mean_vertical: mean(&self.row_diffs),
            mean_horizontal: mean(&self.column_diffs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gray(level: u8) -> PixelSource {
        PixelSource::solid(8, 8, [level, level, level, 255]).unwrap()
    }

    #[test]
    fn test_alpha_curve() {
        let s = SeamSettings::default();
        assert_eq!(seam_alpha(0, &s), 0.15);
        assert_eq!(seam_alpha(10, &s), 0.15);
        assert_eq!(seam_alpha(100, &s), 0.5);
        assert_eq!(seam_alpha(200, &s), 1.0);
        assert_eq!(seam_alpha(765, &s), 1.0);
        for diff in 0..=765 {
            let expected = (diff as f32 / 200.0).clamp(0.15, 1.0);
            assert_eq!(seam_alpha(diff, &s), expected);
        }
    }

    #[test]
    fn test_alpha_with_unvalidated_settings() {
        let inverted = SeamSettings { min_alpha: 1.5, ..SeamSettings::default() };
        assert_eq!(seam_alpha(0, &inverted), 1.0);

        let nan_floor = SeamSettings { min_alpha: f32::NAN, ..SeamSettings::default() };
        assert_eq!(seam_alpha(100, &nan_floor), 0.5);

        let zero_divisor = SeamSettings { diff_divisor: 0.0, ..SeamSettings::default() };
        assert_eq!(seam_alpha(0, &zero_divisor), 0.15);
        assert_eq!(seam_alpha(10, &zero_divisor), 1.0);

        // Analysis must survive such settings as well
        let overlay = SeamOverlay::analyze(&gray(40), &inverted);
        assert_eq!(overlay.row_alpha(0), 1.0);
    }

    #[test]
    fn test_luminance_threshold_branches() {
        let s = SeamSettings::default();

        let dark = seam_color(&gray(100), &s);
        assert_eq!(dark.tone, SeamTone::Light);
        assert_eq!(dark.rgb, s.light_tone);

        let light = seam_color(&gray(160), &s);
        assert_eq!(light.tone, SeamTone::Warning);
        assert_eq!(light.rgb, s.warning_tone);

        // Exactly 128 belongs to the warning side
        assert_eq!(seam_color(&gray(128), &s).tone, SeamTone::Warning);
        assert_eq!(seam_color(&gray(127), &s).tone, SeamTone::Light);
    }

    #[test]
    fn test_row_and_column_diffs() {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 255]));
        // Row 1: right edge differs by 60 per channel -> diff 180
        img.put_pixel(3, 1, Rgba([60, 60, 60, 255]));
        // Column 2: bottom edge differs in red only -> diff 250
        img.put_pixel(2, 2, Rgba([250, 0, 0, 255]));
        let source = PixelSource::new(img).unwrap();
        let overlay = SeamOverlay::analyze(&source, &SeamSettings::default());

        assert_eq!(overlay.row_alpha(0), 0.15);
        assert!((overlay.row_alpha(1) - 0.9).abs() < 1e-6);
        assert_eq!(overlay.column_alpha(2), 1.0);

        let stats = overlay.stats();
        assert_eq!(stats.worst_vertical, 180);
        assert_eq!(stats.worst_horizontal, 250);
    }

    #[test]
    fn test_segment_positions() {
        let source = PixelSource::solid(10, 5, [0, 0, 0, 255]).unwrap();
        let overlay = SeamOverlay::analyze(&source, &SeamSettings::default());

        assert!(overlay.segments(1).is_empty());

        let segments = overlay.segments(3);
        let vertical: Vec<_> = segments.iter().filter(|s| s.axis == SeamAxis::Vertical).collect();
        let horizontal: Vec<_> = segments.iter().filter(|s| s.axis == SeamAxis::Horizontal).collect();

        // 2 internal seams, each spanning 3 tiles of 5 rows / 10 columns
        assert_eq!(vertical.len(), 2 * 3 * 5);
        assert_eq!(horizontal.len(), 2 * 3 * 10);

        let mut xs: Vec<f32> = vertical.iter().map(|s| s.position).collect();
        xs.dedup();
        assert_eq!(xs, vec![10.0, 20.0]);
        assert!(horizontal.iter().all(|s| s.position == 5.0 || s.position == 10.0));
        assert!(vertical.iter().all(|s| s.end - s.start == 1.0 && s.end <= 15.0));
    }
}
