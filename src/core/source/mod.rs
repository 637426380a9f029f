//! # Source Module
//!
//! Where the scanner gets its files from and where duplicates go.
//!
//! The scanner only talks to the [`ImageSource`] trait:
//! - [`FolderSource`] - a real directory on disk (non-recursive)
//! - [`MemorySource`] - in-memory images, for tests and automated callers
//!
//! ## Example
//! ```rust,ignore
//! use near_duplicate_mover::core::source::{FolderSource, ImageSource};
//!
//! let source = FolderSource::new();
//! let files = source.list(Path::new("/Users/me/Pictures"))?;
//! ```

mod filter;
mod folder;
mod memory;

pub use filter::ImageFilter;
pub use folder::FolderSource;
pub use memory::MemorySource;

use crate::error::{HashError, MoveError, ScanError};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Identifies one file of a scan
pub type FileId = PathBuf;

/// Trait for image providers
///
/// Implement this trait to scan something other than a local folder.
pub trait ImageSource: Send + Sync {
    /// List the candidate files of `folder`, in scan order.
    fn list(&self, folder: &Path) -> Result<Vec<FileId>, ScanError>;

    /// Decode one file.
    fn load(&self, file: &Path) -> Result<RgbImage, HashError>;

    /// Relocate `file` from `from` into `to`, keeping its file name.
    fn move_file(&self, file: &Path, from: &Path, to: &Path) -> Result<(), MoveError>;
}

/// Path `file` will have once moved from `from` into `to`.
pub fn destination_path(file: &Path, from: &Path, to: &Path) -> PathBuf {
    match file.strip_prefix(from) {
        Ok(relative) => to.join(relative),
        Err(_) => to.join(file.file_name().unwrap_or(file.as_os_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_keeps_relative_name() {
        let dest = destination_path(
            Path::new("/in/photo.jpg"),
            Path::new("/in"),
            Path::new("/out"),
        );
        assert_eq!(dest, PathBuf::from("/out/photo.jpg"));
    }

    #[test]
    fn destination_falls_back_to_file_name() {
        let dest = destination_path(
            Path::new("/elsewhere/photo.jpg"),
            Path::new("/in"),
            Path::new("/out"),
        );
        assert_eq!(dest, PathBuf::from("/out/photo.jpg"));
    }

    #[test]
    fn bare_file_ids_are_joined_onto_destination() {
        let dest = destination_path(Path::new("b.png"), Path::new("/in"), Path::new("/out"));
        assert_eq!(dest, PathBuf::from("/out/b.png"));
    }
}
