//! Fast SIMD-accelerated image resizing.
//!
//! Uses fast_image_resize, which picks AVX2/NEON code paths when available.
//! The filter is fixed to bilinear convolution so that every image in a scan
//! is reduced the same way.

use crate::error::HashError;
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::RgbImage;
use std::path::PathBuf;

/// Fast image resizer using SIMD acceleration
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    /// Create a new fast resizer
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize an RGB image to exactly `width × height`.
    pub fn resize_rgb(
        &mut self,
        image: &RgbImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, HashError> {
        let (src_width, src_height) = image.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(HashError::EmptyImage {
                path: PathBuf::new(),
            });
        }

        if width == 0 || height == 0 {
            return Err(HashError::DecodeError {
                path: PathBuf::new(),
                reason: "Invalid destination dimensions".to_string(),
            });
        }

        if (src_width, src_height) == (width, height) {
            return Ok(image.clone());
        }

        let src_image = Image::from_vec_u8(
            src_width,
            src_height,
            image.as_raw().clone(),
            PixelType::U8x3,
        )
        .map_err(|e| HashError::DecodeError {
            path: PathBuf::new(),
            reason: format!("Failed to create source image: {}", e),
        })?;

        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| HashError::DecodeError {
                path: PathBuf::new(),
                reason: format!("Resize failed: {}", e),
            })?;

        RgbImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::DecodeError {
                path: PathBuf::new(),
                reason: "Failed to create result buffer".to_string(),
            }
        })
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 128 / (width + height).max(1)) as u8;
            Rgb([r, g, b])
        })
    }

    #[test]
    fn resize_produces_correct_dimensions() {
        let mut resizer = FastResizer::new();
        let resized = resizer.resize_rgb(&create_test_image(100, 100), 8, 8).unwrap();

        assert_eq!(resized.dimensions(), (8, 8));
    }

    #[test]
    fn resize_non_square_image() {
        let mut resizer = FastResizer::new();
        let resized = resizer.resize_rgb(&create_test_image(200, 100), 16, 16).unwrap();

        assert_eq!(resized.dimensions(), (16, 16));
    }

    #[test]
    fn upscales_tiny_images() {
        let mut resizer = FastResizer::new();
        let resized = resizer.resize_rgb(&create_test_image(2, 1), 16, 16).unwrap();

        assert_eq!(resized.dimensions(), (16, 16));
    }

    #[test]
    fn resizer_reuse_is_deterministic() {
        let mut resizer = FastResizer::new();
        let image = create_test_image(100, 60);

        let first = resizer.resize_rgb(&image, 8, 8).unwrap();
        let second = resizer.resize_rgb(&image, 8, 8).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        let mut resizer = FastResizer::new();
        let result = resizer.resize_rgb(&RgbImage::new(0, 0), 8, 8);

        assert!(matches!(result, Err(HashError::EmptyImage { .. })));
    }
}
