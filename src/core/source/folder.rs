//! Local folder source using walkdir.

use super::{destination_path, filter::ImageFilter, FileId, ImageSource};
use crate::core::hasher::FastDecoder;
use crate::error::{HashError, MoveError, ScanError};
use image::RgbImage;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Reads images straight out of one directory
///
/// Only the top level is listed; subfolders are ignored. Files come back
/// sorted by name so repeated runs compare pairs in the same order.
#[derive(Debug, Clone, Default)]
pub struct FolderSource {
    filter: ImageFilter,
}

impl FolderSource {
    /// Create a source with the default image filter
    pub fn new() -> Self {
        Self {
            filter: ImageFilter::new(),
        }
    }

    /// Use a custom filter
    pub fn with_filter(filter: ImageFilter) -> Self {
        Self { filter }
    }
}

impl ImageSource for FolderSource {
    fn list(&self, folder: &Path) -> Result<Vec<FileId>, ScanError> {
        if !folder.is_dir() {
            return Err(ScanError::SourceNotFound {
                path: folder.to_path_buf(),
            });
        }

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry_result in walker {
            let entry = entry_result.map_err(|e| {
                let path = e.path().unwrap_or(folder).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed"));
                if source.kind() == io::ErrorKind::PermissionDenied && path == folder {
                    ScanError::SourceNotFound { path }
                } else {
                    ScanError::ReadDirectory { path, source }
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if self.filter.should_include(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn load(&self, file: &Path) -> Result<RgbImage, HashError> {
        FastDecoder::decode(file)
    }

    fn move_file(&self, file: &Path, from: &Path, to: &Path) -> Result<(), MoveError> {
        let source_path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            from.join(file)
        };

        if !source_path.is_file() {
            return Err(MoveError::SourceMissing { path: source_path });
        }

        if !to.is_dir() {
            return Err(MoveError::DestinationMissing {
                path: to.to_path_buf(),
            });
        }

        let dest_path = destination_path(&source_path, from, to);
        if dest_path.exists() {
            return Err(MoveError::AlreadyExists { path: dest_path });
        }

        let io_error = |source: io::Error| MoveError::Io {
            from: source_path.clone(),
            to: dest_path.clone(),
            source,
        };

        match fs::rename(&source_path, &dest_path) {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) => {
                copy_then_remove(&source_path, &dest_path, |p| fs::remove_file(p)).map_err(io_error)
            }
            Err(e) => Err(io_error(e)),
        }
    }
}

/// `EXDEV` on Unix, `ERROR_NOT_SAME_DEVICE` on Windows
#[cfg(unix)]
const CROSS_DEVICE_CODE: i32 = 18;
#[cfg(windows)]
const CROSS_DEVICE_CODE: i32 = 17;
#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_CODE: i32 = -1;

fn is_cross_device(error: &io::Error) -> bool {
    error.raw_os_error() == Some(CROSS_DEVICE_CODE)
}

/// Copy `source` to `dest`, verify the size, then remove `source`.
///
/// Whenever this fails, `dest` is removed again so the file only ever
/// exists in one of the two folders.
fn copy_then_remove(
    source: &Path,
    dest: &Path,
    remove_source: impl Fn(&Path) -> io::Result<()>,
) -> io::Result<()> {
    let source_size = fs::metadata(source)?.len();
    if let Err(e) = fs::copy(source, dest) {
        let _ = fs::remove_file(dest);
        return Err(e);
    }

    let dest_size = fs::metadata(dest)?.len();
    if dest_size != source_size {
        let _ = fs::remove_file(dest);
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!(
                "Copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            ),
        ));
    }

    if let Err(e) = remove_source(source) {
        let _ = fs::remove_file(dest);
        return Err(e);
    }
    Ok(())
}
