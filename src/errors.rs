use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Failed to load image '{path}': {message}")]
    ImageLoadError { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Tile count out of range: {count}")]
    InvalidTileCount { count: u32 },

    #[error("Settings error: {message}")]
    SettingsError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, InspectorError>;

impl InspectorError {
    /// Returns true if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InspectorError::FileNotFound { .. }
                | InspectorError::InvalidTileCount { .. }
                | InspectorError::IoError { .. }
        )
    }

    /// Returns a user-friendly error message with recovery suggestions
    pub fn user_message(&self) -> String {
        let base_message = self.to_string();
        let suggestion = match self {
            InspectorError::FileNotFound { .. } => "Check if the file exists and you have permission to access it.",
            InspectorError::ImageLoadError { .. } => "The image file may be corrupted or in an unsupported format. Try PNG or JPEG.",
            InspectorError::EmptyImage { .. } => "The image decoded to zero pixels. Pick a different texture.",
            InspectorError::InvalidTileCount { .. } => "Choose between 1 and 9 tiles per axis.",
            InspectorError::SettingsError { .. } | InspectorError::JsonError { .. } => "Settings were reset to defaults. Check settings.json.",
            InspectorError::IoError { .. } => "File system error occurred. Check disk space and permissions.",
        };

        format!("{}\n\n{}", base_message, suggestion)
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            InspectorError::ImageLoadError { .. } => "IMAGE_LOAD_ERROR",
            InspectorError::FileNotFound { .. } => "FILE_NOT_FOUND",
            InspectorError::EmptyImage { .. } => "EMPTY_IMAGE",
            InspectorError::InvalidTileCount { .. } => "INVALID_TILE_COUNT",
            InspectorError::SettingsError { .. } => "SETTINGS_ERROR",
            InspectorError::IoError { .. } => "IO_ERROR",
            InspectorError::JsonError { .. } => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_recovery() {
        let missing = InspectorError::FileNotFound { path: PathBuf::from("/tmp/none.png") };
        assert_eq!(missing.error_code(), "FILE_NOT_FOUND");
        assert!(missing.is_recoverable());
        assert!(missing.to_string().contains("/tmp/none.png"));

        let empty = InspectorError::EmptyImage { width: 0, height: 4 };
        assert!(!empty.is_recoverable());
        assert!(empty.user_message().contains("zero pixels"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InspectorError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
