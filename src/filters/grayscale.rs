//! Grayscale and binarization filters.
//!
//! - `grayscale`: luma-weighted gray (0.2989 R + 0.5870 G + 0.1140 B)
//! - `sharp_grayscale`: channel average snapped to pure black or white
//! - `set_white`: per-channel threshold to 0 / 255
//!
//! The last two are the threshold passes of the edge detector.

use crate::image::{PixelBuffer, Rgb};

/// Luma coefficients (ITU-R BT.601 as commonly rounded).
const LUMA_R: f64 = 0.2989;
const LUMA_G: f64 = 0.5870;
const LUMA_B: f64 = 0.1140;

/// Replace each channel with the truncated luma.
#[inline]
pub fn grayscale(pixel: Rgb) -> Rgb {
    let gray = (pixel[0] as f64 * LUMA_R + pixel[1] as f64 * LUMA_G + pixel[2] as f64 * LUMA_B) as u8;
    [gray, gray, gray]
}

pub fn grayscale_image(image: &mut PixelBuffer) {
    image.map_pixels(grayscale);
}

/// Hard black/white from the integer channel average (< 128 is black).
#[inline]
pub fn sharp_grayscale(pixel: Rgb) -> Rgb {
    let avg = (pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32) / 3;
    let v = if avg < 128 { 0 } else { 255 };
    [v, v, v]
}

pub fn sharp_grayscale_image(image: &mut PixelBuffer) {
    image.map_pixels(sharp_grayscale);
}

/// Per channel: strictly above `threshold` becomes 255, everything else 0.
///
/// Channels are tested independently, so the result can be colored.
#[inline]
pub fn set_white(pixel: Rgb, threshold: i32) -> Rgb {
    pixel.map(|c| if c as i32 > threshold { 255 } else { 0 })
}

pub fn set_white_image(image: &mut PixelBuffer, threshold: i32) {
    image.map_pixels(|px| set_white(px, threshold));
}
