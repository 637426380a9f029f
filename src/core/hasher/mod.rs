//! # Hasher Module
//!
//! Reduces an image to a mean-threshold perceptual fingerprint.
//!
//! ## How It Works
//! 1. Resize the color image to `hash_size × hash_size` (bilinear)
//! 2. Convert to grayscale with ITU-R BT.601 luma
//! 3. Compute the exact mean of all cells
//! 4. Set each bit when its cell is at least as bright as the mean
//!
//! Alongside the fingerprint the hasher renders a preview of it: one pixel
//! per bit, white for 1 and black for 0.
//!
//! ## Example
//! ```rust,ignore
//! use near_duplicate_mover::core::hasher::PerceptualHasher;
//!
//! let mut hasher = PerceptualHasher::new(16)?;
//! let output = hasher.hash_file(&path)?;
//! println!("{}", output.fingerprint.to_hex());
//! ```

pub mod decode;
mod fingerprint;
pub mod resize;

pub use decode::FastDecoder;
pub use fingerprint::{Fingerprint, PerceptualHash};
pub use resize::FastResizer;

use crate::error::HashError;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use std::path::Path;

/// Default side length of the fingerprint grid
pub const DEFAULT_HASH_SIZE: u32 = 16;

/// Largest accepted side length (65536 bits)
pub const MAX_HASH_SIZE: u32 = 256;

/// A fingerprint together with its visual rendition
#[derive(Debug, Clone)]
pub struct HashOutput {
    /// The fingerprint bits
    pub fingerprint: Fingerprint,
    /// `hash_size × hash_size` black/white rendering of the bits
    pub preview: RgbImage,
}

/// Mean-threshold perceptual hasher
pub struct PerceptualHasher {
    hash_size: u32,
    resizer: FastResizer,
}

impl PerceptualHasher {
    /// Create a hasher for `hash_size × hash_size` fingerprints.
    pub fn new(hash_size: u32) -> Result<Self, HashError> {
        if hash_size == 0 || hash_size > MAX_HASH_SIZE {
            return Err(HashError::InvalidHashSize { value: hash_size });
        }
        Ok(Self {
            hash_size,
            resizer: FastResizer::new(),
        })
    }

    /// Side length of the fingerprint grid
    pub fn hash_size(&self) -> u32 {
        self.hash_size
    }

    /// Fingerprint an image and render the fingerprint preview.
    pub fn compute(&mut self, image: &RgbImage) -> Result<HashOutput, HashError> {
        let grid = self.grid(image)?;
        let fingerprint = fingerprint_from_grid(&grid)?;
        let preview = render_preview(&fingerprint);
        Ok(HashOutput {
            fingerprint,
            preview,
        })
    }

    /// Decode a file and fingerprint it.
    pub fn hash_file(&mut self, path: &Path) -> Result<HashOutput, HashError> {
        let image = FastDecoder::decode(path)?;
        self.compute(&image).map_err(|e| e.with_path(path))
    }

    /// The grayscale grid a fingerprint is derived from.
    pub fn grid(&mut self, image: &RgbImage) -> Result<GrayImage, HashError> {
        let small = self
            .resizer
            .resize_rgb(image, self.hash_size, self.hash_size)?;
        Ok(to_luma_bt601(&small))
    }
}

/// Desaturate with `Y = 0.299R + 0.587G + 0.114B`, rounded to nearest.
pub fn to_luma_bt601(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Threshold every cell of `grid` against the grid mean.
///
/// Cells equal to the mean count as set, so a uniform grid yields all ones.
pub fn fingerprint_from_grid(grid: &GrayImage) -> Result<Fingerprint, HashError> {
    let size = grid.width();
    if size == 0 || grid.height() != size {
        return Err(HashError::DecodeError {
            path: std::path::PathBuf::new(),
            reason: format!("grid must be square, got {}x{}", size, grid.height()),
        });
    }

    let cells: Vec<u8> = (0..grid.height())
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .map(|(x, y)| grid.get_pixel(x, y)[0])
        .collect();

    let sum: f64 = cells.iter().map(|&c| c as f64).sum();
    let mean = sum / cells.len() as f64;

    let bits = cells.iter().map(|&c| c as f64 >= mean).collect();

    Fingerprint::from_bits(size, bits).ok_or_else(|| HashError::DecodeError {
        path: std::path::PathBuf::new(),
        reason: "grid cell count does not match its size".to_string(),
    })
}

/// Render a fingerprint as a black/white RGB image, one pixel per bit.
pub fn render_preview(fingerprint: &Fingerprint) -> RgbImage {
    let size = fingerprint.hash_size();
    let gray = GrayImage::from_fn(size, size, |x, y| {
        Luma([if fingerprint.bit(x, y) { 255 } else { 0 }])
    });
    DynamicImage::ImageLuma8(gray).to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    fn create_solid_image(r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_pixel(100, 100, Rgb([r, g, b]))
    }

    fn create_split_image() -> RgbImage {
        // Left half black, right half white
        RgbImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn out_of_range_hash_size_is_rejected() {
        assert!(matches!(
            PerceptualHasher::new(0),
            Err(HashError::InvalidHashSize { value: 0 })
        ));
        assert!(matches!(
            PerceptualHasher::new(MAX_HASH_SIZE + 1),
            Err(HashError::InvalidHashSize { value: 257 })
        ));
        assert!(PerceptualHasher::new(MAX_HASH_SIZE).is_ok());
    }

    #[test]
    fn fingerprint_has_hash_size_squared_bits() {
        for size in [1, 3, 8, 16] {
            let mut hasher = PerceptualHasher::new(size).unwrap();
            let output = hasher.compute(&create_split_image()).unwrap();

            assert_eq!(output.fingerprint.bit_count(), size * size);
            assert_eq!(output.preview.dimensions(), (size, size));
        }
    }

    #[test]
    fn hashing_is_deterministic() {
        let mut hasher = PerceptualHasher::new(16).unwrap();
        let image = create_split_image();

        let first = hasher.compute(&image).unwrap();
        let second = hasher.compute(&image).unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.preview, second.preview);
    }

    #[test]
    fn solid_image_produces_all_ones() {
        for size in [1, 4, 16] {
            let mut hasher = PerceptualHasher::new(size).unwrap();
            let output = hasher.compute(&create_solid_image(90, 140, 30)).unwrap();

            assert_eq!(output.fingerprint.count_ones(), size * size);
        }
    }

    #[test]
    fn bright_half_sets_bits() {
        let mut hasher = PerceptualHasher::new(8).unwrap();
        let output = hasher.compute(&create_split_image()).unwrap();

        assert!(!output.fingerprint.bit(0, 0));
        assert!(output.fingerprint.bit(7, 0));
        assert!(!output.fingerprint.bit(0, 7));
        assert!(output.fingerprint.bit(7, 7));
    }

    #[test]
    fn grid_threshold_is_row_major_and_inclusive() {
        // Mean of [10, 20, 30, 40] is 25; cells at or above it are set.
        let grid = GrayImage::from_raw(2, 2, vec![10, 30, 20, 40]).unwrap();
        let fp = fingerprint_from_grid(&grid).unwrap();
        assert_eq!(fp.bits(), &[false, true, false, true]);

        // 20 equals the mean of [10, 20, 20, 30]
        let grid = GrayImage::from_raw(2, 2, vec![10, 20, 20, 30]).unwrap();
        let fp = fingerprint_from_grid(&grid).unwrap();
        assert_eq!(fp.bits(), &[false, true, true, true]);
    }

    #[test]
    fn non_square_grid_is_rejected() {
        let grid = GrayImage::new(3, 2);
        assert!(fingerprint_from_grid(&grid).is_err());
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let image = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let gray = to_luma_bt601(&image);

        assert_eq!(gray.get_pixel(0, 0)[0], 76);
        assert_eq!(gray.get_pixel(1, 0)[0], 150);
        assert_eq!(gray.get_pixel(2, 0)[0], 29);
    }

    #[test]
    fn preview_is_black_and_white_rgb() {
        let fp = Fingerprint::from_bits(2, vec![true, false, false, true]).unwrap();
        let preview = render_preview(&fp);

        assert_eq!(preview.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(preview.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(preview.get_pixel(0, 1), &Rgb([0, 0, 0]));
        assert_eq!(preview.get_pixel(1, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn hash_file_reports_path_on_decode_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut hasher = PerceptualHasher::new(8).unwrap();
        let error = hasher.hash_file(&path).unwrap_err();

        assert!(error.to_string().contains("broken.png"));
    }
}
