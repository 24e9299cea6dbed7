//! Geometric filters: mirroring, channel rotation, RGB shift, anaglyph.
//!
//! ## Mirror types
//!
//! - **Diagonal**: point reflection through the image center; the middle row
//!   of an odd-height image is left as is
//! - **Vertical**: reflection across the vertical axis (left/right swap)
//! - **Horizontal**: reflection across the horizontal axis (top/bottom swap)
//!
//! Every mirror swaps pixel pairs and stops at the midpoint, so applying it
//! twice restores the image.

use ndarray::ArrayViewMut2;
use serde::{Deserialize, Serialize};

use crate::image::{Channel, PixelBuffer};

/// Fraction of the width the red channel moves left in the anaglyph effect.
const ANAGLYPH_OFFSET: f64 = 0.00925;

// ============================================================================
// Mirror
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MirrorType {
    #[default]
    None,
    Diagonal,
    Vertical,
    Horizontal,
}

/// Point-reflect the top-left `width × height` region through its center.
///
/// The region is clipped to the image.
pub fn mirror_diagonal_region(image: &mut PixelBuffer, width: usize, height: usize) {
    let width = width.min(image.width());
    let height = height.min(image.height());
    for y in 0..height / 2 {
        for x in 0..width {
            image.swap_pixels((x, y), (width - 1 - x, height - 1 - y));
        }
    }
}

/// Point-reflect the whole image through its center.
pub fn mirror_diagonal(image: &mut PixelBuffer) {
    let (width, height) = (image.width(), image.height());
    mirror_diagonal_region(image, width, height);
}

/// Swap columns left/right.
pub fn mirror_vertical(image: &mut PixelBuffer) {
    let width = image.width();
    for y in 0..image.height() {
        for x in 0..width / 2 {
            image.swap_pixels((x, y), (width - 1 - x, y));
        }
    }
}

/// Swap rows top/bottom.
pub fn mirror_horizontal(image: &mut PixelBuffer) {
    let height = image.height();
    for y in 0..height / 2 {
        for x in 0..image.width() {
            image.swap_pixels((x, y), (x, height - 1 - y));
        }
    }
}

pub fn mirror(image: &mut PixelBuffer, kind: MirrorType) {
    match kind {
        MirrorType::None => {}
        MirrorType::Diagonal => mirror_diagonal(image),
        MirrorType::Vertical => mirror_vertical(image),
        MirrorType::Horizontal => mirror_horizontal(image),
    }
}

// ============================================================================
// Channel Rotation
// ============================================================================

/// Circularly shift one channel along a line of pixels.
///
/// # Arguments
/// * `line` - `(len, 3)` view, a row or a column of the image
/// * `channel` - Channel to move; the other two stay in place
/// * `amount` - Positive moves toward higher indices, negative toward lower.
///   Taken modulo the line length.
pub fn rotate(mut line: ArrayViewMut2<u8>, channel: Channel, amount: i32) {
    let len = line.nrows();
    if len == 0 {
        return;
    }
    let c = channel.index();
    let mut values: Vec<u8> = line.column(c).to_vec();

    let shift = (amount.unsigned_abs() as usize) % len;
    if amount >= 0 {
        values.rotate_right(shift);
    } else {
        values.rotate_left(shift);
    }

    for (dst, v) in line.column_mut(c).iter_mut().zip(values) {
        *dst = v;
    }
}

// ============================================================================
// RGB Shift
// ============================================================================

/// Per-channel displacement, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RgbShift {
    pub red_x: i32,
    pub red_y: i32,
    pub green_x: i32,
    pub green_y: i32,
    pub blue_x: i32,
    pub blue_y: i32,
}

impl RgbShift {
    fn x_amounts(&self) -> [(Channel, i32); 3] {
        [
            (Channel::Red, self.red_x),
            (Channel::Green, self.green_x),
            (Channel::Blue, self.blue_x),
        ]
    }

    fn y_amounts(&self) -> [(Channel, i32); 3] {
        [
            (Channel::Red, self.red_y),
            (Channel::Green, self.green_y),
            (Channel::Blue, self.blue_y),
        ]
    }

    pub fn is_zero(&self) -> bool {
        *self == RgbShift::default()
    }
}

/// Rotate each channel along every row by its x amount, then along every
/// column by its y amount.
pub fn rgb_shift(image: &mut PixelBuffer, shift: &RgbShift) {
    for y in 0..image.height() {
        for (channel, amount) in shift.x_amounts() {
            rotate(image.row_mut(y), channel, amount);
        }
    }
    for x in 0..image.width() {
        for (channel, amount) in shift.y_amounts() {
            if amount != 0 {
                rotate(image.column_mut(x), channel, amount);
            }
        }
    }
}

/// Red/cyan stereo look: the red channel moves left by about 1 % of the width.
pub fn anaglyph_3d(image: &mut PixelBuffer) {
    let amount = -((image.width() as f64 * ANAGLYPH_OFFSET) as i32);
    for y in 0..image.height() {
        rotate(image.row_mut(y), Channel::Red, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let n = (y * width + x) as u8;
                img.set_pixel(x, y, [n, n.wrapping_add(100), n.wrapping_mul(3)]);
            }
        }
        img
    }

    fn reds(img: &PixelBuffer, y: usize) -> Vec<u8> {
        (0..img.width()).map(|x| img.pixel(x, y)[0]).collect()
    }

    #[test]
    fn test_mirrors_are_involutions() {
        for (w, h) in [(4, 4), (5, 3), (1, 7), (6, 1)] {
            let original = numbered(w, h);
            for kind in [MirrorType::Diagonal, MirrorType::Vertical, MirrorType::Horizontal] {
                let mut img = original.clone();
                mirror(&mut img, kind);
                mirror(&mut img, kind);
                assert_eq!(img, original, "{:?} on {}x{}", kind, w, h);
            }
        }
    }

    #[test]
    fn test_mirror_diagonal_keeps_odd_middle_row() {
        let original = numbered(3, 3);
        let mut img = original.clone();
        mirror_diagonal(&mut img);

        assert_eq!(img.pixel(0, 0), original.pixel(2, 2));
        assert_eq!(img.pixel(2, 2), original.pixel(0, 0));
        for x in 0..3 {
            assert_eq!(img.pixel(x, 1), original.pixel(x, 1));
        }
    }

    #[test]
    fn test_mirror_vertical_and_horizontal() {
        let original = numbered(3, 2);
        let mut v = original.clone();
        mirror_vertical(&mut v);
        assert_eq!(v.pixel(0, 1), original.pixel(2, 1));

        let mut h = original.clone();
        mirror_horizontal(&mut h);
        assert_eq!(h.pixel(2, 0), original.pixel(2, 1));
    }

    #[test]
    fn test_mirror_region_leaves_rest_untouched() {
        let original = numbered(6, 6);
        let mut img = original.clone();
        mirror_diagonal_region(&mut img, 2, 2);

        assert_eq!(img.pixel(0, 0), original.pixel(1, 1));
        assert_eq!(img.pixel(1, 0), original.pixel(0, 1));
        assert_eq!(img.pixel(2, 0), original.pixel(2, 0));
        assert_eq!(img.pixel(5, 5), original.pixel(5, 5));
    }

    #[test]
    fn test_rotate_direction_and_modulo() {
        let mut img = PixelBuffer::new(4, 1).unwrap();
        for x in 0..4 {
            img.set_pixel(x, 0, [x as u8, 7, 7]);
        }

        rotate(img.row_mut(0), Channel::Red, 1);
        assert_eq!(reds(&img, 0), vec![3, 0, 1, 2]);

        rotate(img.row_mut(0), Channel::Red, -2);
        assert_eq!(reds(&img, 0), vec![1, 2, 3, 0]);

        rotate(img.row_mut(0), Channel::Red, 9);
        assert_eq!(reds(&img, 0), vec![0, 1, 2, 3]);

        // Other channels untouched
        assert_eq!(img.pixel(2, 0)[1], 7);
    }

    #[test]
    fn test_rgb_shift_moves_channels_independently() {
        let original = numbered(4, 3);
        let mut img = original.clone();
        let shift = RgbShift { red_x: 1, blue_y: -1, ..Default::default() };
        rgb_shift(&mut img, &shift);

        // Red moved one column right
        assert_eq!(img.pixel(1, 0)[0], original.pixel(0, 0)[0]);
        // Green untouched
        assert_eq!(img.pixel(1, 0)[1], original.pixel(1, 0)[1]);
        // Blue moved one row up
        assert_eq!(img.pixel(2, 0)[2], original.pixel(2, 1)[2]);
    }

    #[test]
    fn test_anaglyph_shifts_red_left() {
        // 0.00925 * 216 = 1.998 -> 1 pixel
        let original = numbered(216, 1);
        let mut img = original.clone();
        anaglyph_3d(&mut img);

        assert_eq!(img.pixel(0, 0)[0], original.pixel(1, 0)[0]);
        assert_eq!(img.pixel(215, 0)[0], original.pixel(0, 0)[0]);
        assert_eq!(img.pixel(0, 0)[1], original.pixel(0, 0)[1]);
    }

    #[test]
    fn test_anaglyph_narrow_image_unchanged() {
        let original = numbered(100, 2);
        let mut img = original.clone();
        anaglyph_3d(&mut img);
        assert_eq!(img, original);
    }

    #[test]
    fn test_rgb_shift_from_json() {
        let shift: RgbShift = serde_json::from_str(r#"{"red-x": 3, "blue-y": -2}"#).unwrap();
        assert_eq!(shift.red_x, 3);
        assert_eq!(shift.blue_y, -2);
        assert_eq!(shift.green_x, 0);
        assert!(!shift.is_zero());
    }
}
