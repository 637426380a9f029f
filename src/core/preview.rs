//! Comparison frame rendering.
//!
//! Builds the picture an operator looks at while deciding:
//!
//! ```text
//! +-----------+-----------+
//! | reference | candidate |
//! +-----------+-----------+
//! | ref hash  | cand hash |
//! +-----------+-----------+
//! ```
//!
//! with `SIMILAR: <count>` stamped in red in the top-left corner.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Overlay color
const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Glyph cell width in font pixels, spacing included
const GLYPH_ADVANCE: u32 = 6;
const GLYPH_HEIGHT: u32 = 7;
const LABEL_SCALE: u32 = 3;
const LABEL_ORIGIN: (u32, u32) = (5, 5);

/// Compose the 2x2 comparison frame, each tile `tile × tile` pixels.
pub fn compose_frame(
    reference: &RgbImage,
    candidate: &RgbImage,
    reference_hash: &RgbImage,
    candidate_hash: &RgbImage,
    duplicate_count: usize,
    tile: u32,
) -> RgbImage {
    let mut frame = RgbImage::new(tile * 2, tile * 2);

    let tiles = [
        (reference, FilterType::Triangle, 0, 0),
        (candidate, FilterType::Triangle, tile, 0),
        // Nearest keeps fingerprint cells as sharp squares
        (reference_hash, FilterType::Nearest, 0, tile),
        (candidate_hash, FilterType::Nearest, tile, tile),
    ];

    for (image, filter, x, y) in tiles {
        if image.width() == 0 || image.height() == 0 {
            continue;
        }
        if image.dimensions() == (tile, tile) {
            imageops::replace(&mut frame, image, x as i64, y as i64);
        } else {
            let scaled = imageops::resize(image, tile, tile, filter);
            imageops::replace(&mut frame, &scaled, x as i64, y as i64);
        }
    }

    overlay_label(&mut frame, &format!("SIMILAR: {}", duplicate_count));
    frame
}

/// Stamp `text` onto the top-left corner of `frame`.
///
/// Characters without a glyph are drawn as blanks. Pixels falling outside
/// the frame are clipped.
pub fn overlay_label(frame: &mut RgbImage, text: &str) {
    let (origin_x, origin_y) = LABEL_ORIGIN;

    for (index, ch) in text.chars().enumerate() {
        let rows = glyph(ch);
        let cell_x = origin_x + index as u32 * GLYPH_ADVANCE * LABEL_SCALE;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let x0 = cell_x + col * LABEL_SCALE;
                let y0 = origin_y + row as u32 * LABEL_SCALE;
                fill_block(frame, x0, y0, LABEL_SCALE);
            }
        }
    }
}

fn fill_block(frame: &mut RgbImage, x0: u32, y0: u32, size: u32) {
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            if x < frame.width() && y < frame.height() {
                frame.put_pixel(x, y, LABEL_COLOR);
            }
        }
    }
}

/// 5x7 bitmap, one byte per row, bit 4 is the leftmost column.
fn glyph(ch: char) -> [u8; GLYPH_HEIGHT as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => [0x00; GLYPH_HEIGHT as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(size, size, Rgb([value, value, value]))
    }

    #[test]
    fn frame_is_two_tiles_square() {
        let frame = compose_frame(
            &RgbImage::from_pixel(640, 480, Rgb([0, 0, 0])),
            &solid(30, 0),
            &solid(16, 255),
            &solid(16, 0),
            0,
            200,
        );
        assert_eq!(frame.dimensions(), (400, 400));
    }

    #[test]
    fn tiles_land_in_their_quadrants() {
        let frame = compose_frame(&solid(10, 10), &solid(10, 60), &solid(4, 255), &solid(4, 0), 1, 50);

        // Away from the label
        assert_eq!(frame.get_pixel(40, 40), &Rgb([10, 10, 10]));
        assert_eq!(frame.get_pixel(90, 40), &Rgb([60, 60, 60]));
        assert_eq!(frame.get_pixel(40, 90), &Rgb([255, 255, 255]));
        assert_eq!(frame.get_pixel(90, 90), &Rgb([0, 0, 0]));
    }

    #[test]
    fn label_is_drawn_in_red() {
        let mut frame = solid(200, 0);
        overlay_label(&mut frame, "S");

        // Top row of 'S' starts at its second column
        assert_eq!(frame.get_pixel(5, 5), &Rgb([0, 0, 0]));
        assert_eq!(frame.get_pixel(8, 5), &LABEL_COLOR);
    }

    #[test]
    fn different_counts_draw_different_labels() {
        let tile = 100;
        let a = compose_frame(&solid(8, 0), &solid(8, 0), &solid(8, 0), &solid(8, 0), 1, tile);
        let b = compose_frame(&solid(8, 0), &solid(8, 0), &solid(8, 0), &solid(8, 0), 7, tile);

        assert_ne!(a, b);
    }

    #[test]
    fn label_is_clipped_on_tiny_frames() {
        let mut frame = solid(4, 0);
        overlay_label(&mut frame, "SIMILAR: 12");
        assert_eq!(frame.dimensions(), (4, 4));
    }

    #[test]
    fn unknown_characters_are_blank() {
        assert_eq!(glyph('?'), [0; 7]);
        assert_eq!(glyph('s'), glyph('S'));
    }
}
