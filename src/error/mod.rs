//! # Error Module
//!
//! Error types for the near-duplicate mover.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Classify, don't present** - callers decide how to show an error
//!
//! Only configuration problems and a missing source folder abort a run
//! outright. Move failures are reported per pair and never abort.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DuplicateFinderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),
}

/// Invalid scan settings, raised before any file I/O happens
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid threshold: {value} (must be 0-100)")]
    InvalidThreshold { value: u32 },

    #[error("Invalid hash size: {value} (must be 1-256)")]
    InvalidHashSize { value: u32 },

    #[error("Invalid preview size: {value} (must be at least 1)")]
    InvalidPreviewSize { value: u32 },

    #[error("Source and destination are the same folder: {path}")]
    SameFolder { path: PathBuf },
}

/// Errors that occur while listing the source folder
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source folder not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding or hashing an image
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hash size must be 1-256, got {value}")]
    InvalidHashSize { value: u32 },
}

impl HashError {
    /// Attach a path to an error produced before the path was known.
    pub fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            HashError::DecodeError { reason, .. } => HashError::DecodeError {
                path: path.to_path_buf(),
                reason,
            },
            HashError::EmptyImage { .. } => HashError::EmptyImage {
                path: path.to_path_buf(),
            },
            other => other,
        }
    }
}

/// Errors that occur while relocating a duplicate
///
/// Never wrapped in [`DuplicateFinderError`]: the scanner logs these and
/// keeps the file.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("File vanished before it could be moved: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Destination folder does not exist: {path}")]
    DestinationMissing { path: PathBuf },

    #[error("Refusing to overwrite existing file: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to move {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DuplicateFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::SourceNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn hash_error_includes_path() {
        let error = HashError::DecodeError {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn with_path_fills_in_missing_path() {
        let error = HashError::DecodeError {
            path: PathBuf::new(),
            reason: "zero width".to_string(),
        }
        .with_path(std::path::Path::new("/photos/a.png"));

        assert!(error.to_string().contains("/photos/a.png"));
    }

    #[test]
    fn config_error_converts_to_top_level() {
        let error: DuplicateFinderError = ConfigError::InvalidThreshold { value: 150 }.into();
        assert!(matches!(error, DuplicateFinderError::Config(_)));
        assert!(error.to_string().contains("150"));
    }

    #[test]
    fn move_error_names_both_paths() {
        let error = MoveError::Io {
            from: PathBuf::from("/src/a.jpg"),
            to: PathBuf::from("/dst/a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/src/a.jpg"));
        assert!(message.contains("/dst/a.jpg"));
    }
}
