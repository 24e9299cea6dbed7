//! Color adjustment filters: Invert, Contrast, Sine Color Shift.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Each filter comes as a pure per-pixel function plus an in-place
//! whole-image variant.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::filters::math::clamp;
use crate::image::{PixelBuffer, Rgb};

// ============================================================================
// Invert
// ============================================================================

/// Invert every channel (`|c - 255|`).
#[inline]
pub fn invert(pixel: Rgb) -> Rgb {
    pixel.map(|c| (c as i32 - 255).unsigned_abs() as u8)
}

pub fn invert_image(image: &mut PixelBuffer) {
    image.map_pixels(invert);
}

// ============================================================================
// Contrast
// ============================================================================

/// Level at which the contrast factor's denominator vanishes.
const CONTRAST_POLE: f64 = 259.0;

/// Adjust contrast with the classic `259 (level + 255) / (255 (259 - level))`
/// factor around mid-gray 128.
///
/// # Arguments
/// * `pixel` - Input pixel
/// * `level` - Contrast level, roughly -255..255; 0 = no change. A level of
///   exactly 259 leaves the pixel untouched.
pub fn contrast(pixel: Rgb, level: f64) -> Rgb {
    if level == CONTRAST_POLE {
        return pixel;
    }
    let factor = (CONTRAST_POLE * (level + 255.0)) / (255.0 * (CONTRAST_POLE - level));
    pixel.map(|c| clamp(factor * (c as f64 - 128.0) + 128.0, 0.0, 255.0) as u8)
}

pub fn contrast_image(image: &mut PixelBuffer, level: f64) {
    image.map_pixels(|px| contrast(px, level));
}

// ============================================================================
// Sine Color Shift
// ============================================================================

/// Parameters of the sinusoidal channel distortion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineShift {
    pub amplifier: f64,
    pub frequency: f64,
    /// Phase in degrees.
    pub phase: f64,
    pub bias: f64,
}

impl SineShift {
    /// Amplifier 0.5, phase 90 degrees, bias 1 around the given frequency.
    pub fn with_frequency(frequency: f64) -> Self {
        SineShift {
            amplifier: 0.5,
            frequency,
            phase: 90.0,
            bias: 1.0,
        }
    }
}

/// Scale each channel by `|amplifier * sin(2π (freq * c + phase / 360)) + bias|`.
pub fn sine_color_shift(pixel: Rgb, shift: SineShift) -> Rgb {
    pixel.map(|c| {
        let c = c as f64;
        let wave = shift.amplifier
            * (2.0 * PI * (shift.frequency * c + shift.phase / 360.0)).sin()
            + shift.bias;
        clamp(c * wave.abs(), 0.0, 255.0) as u8
    })
}

pub fn sine_color_shift_image(image: &mut PixelBuffer, shift: SineShift) {
    image.map_pixels(|px| sine_color_shift(px, shift));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert() {
        assert_eq!(invert([0, 128, 255]), [255, 127, 0]);
        assert_eq!(invert(invert([12, 34, 56])), [12, 34, 56]);
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        // factor = 259 * 255 / (255 * 259) = 1
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            assert_eq!(contrast([v, v, v], 0.0), [v, v, v]);
        }
    }

    #[test]
    fn test_contrast_pole_is_noop() {
        assert_eq!(contrast([10, 128, 250], 259.0), [10, 128, 250]);
    }

    #[test]
    fn test_contrast_increase_spreads_from_mid_gray() {
        let out = contrast([100, 128, 160], 64.0);
        assert!(out[0] < 100);
        assert_eq!(out[1], 128);
        assert!(out[2] > 160);
    }

    #[test]
    fn test_contrast_clamps() {
        let out = contrast([0, 255, 128], 250.0);
        assert_eq!(out, [0, 255, 128]);
    }

    #[test]
    fn test_sine_shift_zero_amplifier_is_bias_scale() {
        let shift = SineShift { amplifier: 0.0, frequency: 3.0, phase: 0.0, bias: 1.0 };
        assert_eq!(sine_color_shift([10, 100, 250], shift), [10, 100, 250]);

        let double = SineShift { bias: 2.0, ..shift };
        assert_eq!(sine_color_shift([10, 100, 250], double), [20, 200, 255]);
    }

    #[test]
    fn test_sine_shift_from_json() {
        let json = r#"{"amplifier": 0.5, "frequency": 0.7, "phase": 90.0, "bias": 1.0}"#;
        let shift: SineShift = serde_json::from_str(json).unwrap();
        assert_eq!(shift, SineShift::with_frequency(0.7));
    }

    #[test]
    fn test_sine_shift_black_stays_black() {
        let mut img = PixelBuffer::new(2, 2).unwrap();
        sine_color_shift_image(&mut img, SineShift::with_frequency(0.7));
        assert_eq!(img.pixel(1, 1), [0, 0, 0]);
    }
}
