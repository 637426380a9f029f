//! In-memory image source for testing.

use super::{destination_path, FileId, ImageSource};
use crate::error::{HashError, MoveError, ScanError};
use image::RgbImage;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

struct Entry {
    path: PathBuf,
    image: Option<RgbImage>,
}

/// In-memory image source
///
/// Holds one virtual folder of images. Useful for testing and for automated
/// callers that already have decoded images at hand. Moves are recorded
/// instead of touching the filesystem.
pub struct MemorySource {
    folder: PathBuf,
    entries: RwLock<Vec<Entry>>,
    moved: RwLock<Vec<(PathBuf, PathBuf)>>,
    failing_moves: RwLock<HashSet<PathBuf>>,
}

impl MemorySource {
    /// Create an empty virtual folder
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            entries: RwLock::new(Vec::new()),
            moved: RwLock::new(Vec::new()),
            failing_moves: RwLock::new(HashSet::new()),
        }
    }

    /// Add an image under `name`; listing keeps insertion order
    pub fn with_image(self, name: &str, image: RgbImage) -> Self {
        self.push(name, Some(image));
        self
    }

    /// Add a file that fails to decode
    pub fn with_corrupt(self, name: &str) -> Self {
        self.push(name, None);
        self
    }

    /// Make every move of `name` fail
    pub fn with_failing_move(self, name: &str) -> Self {
        if let Ok(mut failing) = self.failing_moves.write() {
            failing.insert(self.folder.join(name));
        }
        self
    }

    /// Full path of `name` inside the virtual folder
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }

    /// Files still in the folder
    pub fn files(&self) -> Vec<PathBuf> {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default()
    }

    /// `(from, to)` of every successful move, in order
    pub fn moves(&self) -> Vec<(PathBuf, PathBuf)> {
        self.moved.read().map(|m| m.clone()).unwrap_or_default()
    }

    fn push(&self, name: &str, image: Option<RgbImage>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(Entry {
                path: self.folder.join(name),
                image,
            });
        }
    }
}

impl ImageSource for MemorySource {
    fn list(&self, folder: &Path) -> Result<Vec<FileId>, ScanError> {
        if folder != self.folder {
            return Err(ScanError::SourceNotFound {
                path: folder.to_path_buf(),
            });
        }
        Ok(self.files())
    }

    fn load(&self, file: &Path) -> Result<RgbImage, HashError> {
        let entries = self.entries.read().map_err(|_| HashError::DecodeError {
            path: file.to_path_buf(),
            reason: "source lock poisoned".to_string(),
        })?;

        match entries.iter().find(|e| e.path == file) {
            Some(Entry {
                image: Some(image), ..
            }) => Ok(image.clone()),
            Some(_) => Err(HashError::DecodeError {
                path: file.to_path_buf(),
                reason: "corrupt image data".to_string(),
            }),
            None => Err(HashError::IoError {
                path: file.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }),
        }
    }

    fn move_file(&self, file: &Path, from: &Path, to: &Path) -> Result<(), MoveError> {
        let dest = destination_path(file, from, to);
        let denied = |path: &Path| MoveError::Io {
            from: path.to_path_buf(),
            to: dest.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "move refused"),
        };

        let fails = self
            .failing_moves
            .read()
            .map(|failing| failing.contains(file))
            .unwrap_or(true);
        if fails {
            return Err(denied(file));
        }

        let mut entries = self.entries.write().map_err(|_| denied(file))?;
        let position = entries
            .iter()
            .position(|e| e.path == file)
            .ok_or_else(|| MoveError::SourceMissing {
                path: file.to_path_buf(),
            })?;
        entries.remove(position);

        if let Ok(mut moved) = self.moved.write() {
            moved.push((file.to_path_buf(), dest));
        }
        Ok(())
    }
}
