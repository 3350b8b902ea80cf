use crate::errors::{InspectorError, Result};
use crate::viewport::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

/// Application configuration. View state (scale, pan, rotation) is deliberately
/// not part of it and never written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid
    pub default_tiles: u32,
    pub max_tiles: u32,
    pub show_seams_on_start: bool,

    // Zoom / rotation behavior
    pub zoom: ZoomSettings,
    pub rotate_step_degrees: f32,

    // Seam overlay
    pub seams: SeamSettings,

    // Photo preview
    pub preview: PreviewSettings,

    // Appearance
    pub background_color: [u8; 3],
    pub placeholder_color: [u8; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_tiles: 3,
            max_tiles: 9,
            show_seams_on_start: false,

            zoom: ZoomSettings::default(),
            rotate_step_degrees: 15.0,

            seams: SeamSettings::default(),

            preview: PreviewSettings::default(),

            background_color: [18, 18, 20],
            placeholder_color: [48, 48, 52],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Multiplier applied per "zoom in" wheel tick.
    pub step: f32,
    /// Multiplier per "zoom out" tick. `None` means `1 / step`, which makes
    /// in/out ticks cancel exactly.
    pub out_step: Option<f32>,
    pub min_scale: Option<f32>,
    pub max_scale: Option<f32>,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: 1.1,
            out_step: None,
            min_scale: None,
            max_scale: None,
        }
    }
}

impl ZoomSettings {
    pub fn in_factor(&self) -> f32 {
        self.step
    }

    pub fn out_factor(&self) -> f32 {
        self.out_step.unwrap_or(1.0 / self.step)
    }

    pub fn limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min_scale,
            max: self.max_scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeamSettings {
    pub min_alpha: f32,
    /// Channel-difference sum that maps to full opacity.
    pub diff_divisor: f32,
    pub luminance_threshold: u8,
    /// Used on dark textures.
    pub light_tone: [u8; 3],
    /// Used on light textures.
    pub warning_tone: [u8; 3],
    /// Stroke width in texture pixels.
    pub stroke_width: f32,
    /// Stroke never gets thinner than this many screen pixels.
    pub min_screen_width: f32,
}

impl Default for SeamSettings {
    fn default() -> Self {
        Self {
            min_alpha: 0.15,
            diff_divisor: 200.0,
            luminance_threshold: 128,
            light_tone: [235, 235, 225],
            warning_tone: [255, 36, 36],
            stroke_width: 2.0,
            min_screen_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// A named mask region: pixels whose `channel` is at least `min_value` and
/// exceeds both other channels by `min_margin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRule {
    pub name: String,
    pub channel: Channel,
    pub min_value: u8,
    pub min_margin: u8,
    /// Texture shift as a fraction of the tile size.
    #[serde(default)]
    pub texture_offset: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub photo_path: PathBuf,
    pub mask_path: PathBuf,
    /// Composited in this order.
    pub regions: Vec<RegionRule>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            photo_path: PathBuf::from("assets/reference_photo.jpg"),
            mask_path: PathBuf::from("assets/reference_mask.png"),
            regions: vec![
                RegionRule {
                    name: "bottom".to_string(),
                    channel: Channel::Green,
                    min_value: 100,
                    min_margin: 40,
                    texture_offset: [0.0, 0.0],
                },
                RegionRule {
                    name: "top".to_string(),
                    channel: Channel::Blue,
                    min_value: 100,
                    min_margin: 40,
                    texture_offset: [0.37, 0.61],
                },
            ],
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tileinspector", "TileInspector")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Loads settings from the platform config dir, writing the defaults there
    /// on first run so they can be edited.
    pub fn load() -> Self {
        let Some(config_path) = Self::config_path() else {
            return Self::default();
        };

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(settings) => return settings,
                Err(e) => {
                    log::warn!("Ignoring {}: {}", config_path.display(), e);
                    return Self::default();
                }
            }
        }

        let settings = Self::default();
        if let Err(e) = settings.save_to(&config_path) {
            log::debug!("Could not write default settings: {}", e);
        }
        settings
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_tiles == 0 || self.default_tiles > self.max_tiles {
            return Err(InspectorError::SettingsError {
                message: format!(
                    "default_tiles must be within 1..={}, got {}",
                    self.max_tiles, self.default_tiles
                ),
            });
        }
        if !(self.zoom.step.is_finite() && self.zoom.step > 1.0) {
            return Err(InspectorError::SettingsError {
                message: format!("zoom.step must be > 1, got {}", self.zoom.step),
            });
        }
        if let Some(out) = self.zoom.out_step {
            if !(out.is_finite() && out > 0.0 && out < 1.0) {
                return Err(InspectorError::SettingsError {
                    message: format!("zoom.out_step must be within (0, 1), got {}", out),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.zoom.min_scale, self.zoom.max_scale) {
            if min <= 0.0 || min > max {
                return Err(InspectorError::SettingsError {
                    message: format!("invalid zoom limits {}..{}", min, max),
                });
            }
        }
        let seams = &self.seams;
        if !(seams.min_alpha.is_finite() && (0.0..=1.0).contains(&seams.min_alpha)) {
            return Err(InspectorError::SettingsError {
                message: format!("seams.min_alpha must be within 0..=1, got {}", seams.min_alpha),
            });
        }
        if !(seams.diff_divisor.is_finite() && seams.diff_divisor > 0.0) {
            return Err(InspectorError::SettingsError {
                message: format!("seams.diff_divisor must be positive, got {}", seams.diff_divisor),
            });
        }
        if !(seams.stroke_width.is_finite() && seams.min_screen_width.is_finite()) {
            return Err(InspectorError::SettingsError {
                message: "seam stroke widths must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn rotate_step(&self) -> f32 {
        self.rotate_step_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.default_tiles = 4;
        settings.zoom.max_scale = Some(16.0);
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "default_tiles": 2, "seams": { "min_alpha": 0.3 } }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.default_tiles, 2);
        assert_eq!(loaded.seams.min_alpha, 0.3);
        assert_eq!(loaded.seams.diff_divisor, 200.0);
        assert_eq!(loaded.preview.regions.len(), 2);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "default_tiles": 0 }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert_eq!(err.error_code(), "SETTINGS_ERROR");

        for seams in [
            r#"{ "seams": { "min_alpha": 1.5 } }"#,
            r#"{ "seams": { "min_alpha": -0.1 } }"#,
            r#"{ "seams": { "diff_divisor": 0.0 } }"#,
            r#"{ "seams": { "diff_divisor": -3.0 } }"#,
        ] {
            std::fs::write(&path, seams).unwrap();
            let err = Settings::load_from(&path).unwrap_err();
            assert_eq!(err.error_code(), "SETTINGS_ERROR", "{}", seams);
        }

        // JSON has no NaN literal, so check the non-finite case directly
        let mut settings = Settings::default();
        settings.seams.min_alpha = f32::NAN;
        assert!(settings.validate().is_err());
        settings.seams.min_alpha = 0.15;
        settings.seams.diff_divisor = f32::NAN;
        assert!(settings.validate().is_err());
        settings.seams.diff_divisor = f32::INFINITY;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zoom_out_defaults_to_reciprocal() {
        let zoom = ZoomSettings::default();
        assert!((zoom.in_factor() * zoom.out_factor() - 1.0).abs() < 1e-6);

        let legacy = ZoomSettings { out_step: Some(0.9), ..ZoomSettings::default() };
        assert_eq!(legacy.out_factor(), 0.9);
    }
}
