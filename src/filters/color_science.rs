//! Color science filters: RGB <-> HSL conversion, Lightness, Hue Shift.
//!
//! All conversions run in `f64`. HSL components are normalized to 0.0-1.0
//! (hue included, so a full turn is 1.0 rather than 360 degrees).
//!
//! ## Precision
//!
//! Converting HSL back to 8-bit truncates (`value * 255` cast toward zero).
//! Every filter in this crate uses the same convention, so a round trip
//! `rgb_to_hsl -> hsl_to_rgb` is exact or one step low per channel.

use crate::filters::math::{clamp, max, min};
use crate::image::{PixelBuffer, Rgb};

// ============================================================================
// Color Space Conversion
// ============================================================================

/// HSL color, every component in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Convert an RGB pixel to HSL.
///
/// When two channels share the maximum, red wins over green and green over
/// blue for choosing the hue sector.
pub fn rgb_to_hsl(pixel: Rgb) -> Hsl {
    let r = pixel[0] as f64 / 255.0;
    let g = pixel[1] as f64 / 255.0;
    let b = pixel[2] as f64 / 255.0;

    let channels = [r, g, b];
    let x_min = min(&channels).unwrap_or(0.0);
    let x_max = max(&channels).unwrap_or(0.0);

    let l = (x_min + x_max) / 2.0;
    let mut h = 0.0;
    let mut s = 0.0;

    if x_min != x_max {
        let d = x_max - x_min;
        s = if l < 0.5 {
            d / (x_max + x_min)
        } else {
            d / (2.0 - x_max - x_min)
        };

        if r == x_max {
            h = (g - b) / d + if g < b { 6.0 } else { 0.0 };
        } else if g == x_max {
            h = 2.0 + (b - r) / d;
        } else {
            h = 4.0 + (r - g) / d;
        }

        if h < 0.0 {
            h += 6.0;
        }
        h /= 6.0;
    }

    Hsl { h, s, l }
}

/// Piecewise channel function of the HSL -> RGB conversion.
#[inline]
fn hue_to_channel(temp1: f64, temp2: f64, t: f64) -> f64 {
    if t < 1.0 / 6.0 {
        return temp1 + (temp2 - temp1) * 6.0 * t;
    }
    if t < 0.5 {
        return temp2;
    }
    if t < 2.0 / 3.0 {
        return temp1 + (temp2 - temp1) * (2.0 / 3.0 - t) * 6.0;
    }
    temp1
}

/// Convert HSL back to an RGB pixel (truncating to 8 bits).
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return [v, v, v];
    }

    let temp2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let temp1 = 2.0 * l - temp2;

    let mut t_r = h + 1.0 / 3.0;
    if t_r > 1.0 {
        t_r -= 1.0;
    }
    let t_g = h;
    let mut t_b = h - 1.0 / 3.0;
    if t_b < 0.0 {
        t_b += 1.0;
    }

    [
        (hue_to_channel(temp1, temp2, t_r) * 255.0) as u8,
        (hue_to_channel(temp1, temp2, t_g) * 255.0) as u8,
        (hue_to_channel(temp1, temp2, t_b) * 255.0) as u8,
    ]
}

// ============================================================================
// Lightness
// ============================================================================

/// Shift HSL lightness by `percent` (-100..100), clamped to the valid range.
pub fn change_light(pixel: Rgb, percent: i32) -> Rgb {
    let mut hsl = rgb_to_hsl(pixel);
    hsl.l = clamp(hsl.l + percent as f64 / 100.0, 0.0, 1.0);
    hsl_to_rgb(hsl)
}

/// Shift lightness of every pixel in place.
pub fn change_light_image(image: &mut PixelBuffer, percent: i32) {
    image.map_pixels(|px| change_light(px, percent));
}

// ============================================================================
// Hue Shift
// ============================================================================

/// Rotate hue by `value` hundredths of a turn.
///
/// The new hue is `|trunc(h * 100 + value)| mod 100 / 100`. Negative
/// results fold through the absolute value instead of wrapping, so a shift
/// of -10 on hue 0.05 lands on 0.05 rather than 0.95.
pub fn hue_shift(pixel: Rgb, value: f64) -> Rgb {
    let mut hsl = rgb_to_hsl(pixel);
    let shifted = (hsl.h * 100.0 + value) as i64;
    hsl.h = (shifted.unsigned_abs() % 100) as f64 / 100.0;
    hsl_to_rgb(hsl)
}

/// Shift hue of every pixel in place.
pub fn hue_shift_image(image: &mut PixelBuffer, value: f64) {
    image.map_pixels(|px| hue_shift(px, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hsl_roundtrip_exhaustive() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    let out = hsl_to_rgb(rgb_to_hsl([r, g, b]));
                    assert!(
                        (out[0] as i32 - r as i32).abs() <= 1
                            && (out[1] as i32 - g as i32).abs() <= 1
                            && (out[2] as i32 - b as i32).abs() <= 1,
                        "({}, {}, {}) -> {:?}",
                        r,
                        g,
                        b,
                        out
                    );
                }
            }
        }
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = rgb_to_hsl([255, 0, 0]);
        assert_eq!(red.h, 0.0);
        assert_eq!(red.s, 1.0);
        assert_eq!(red.l, 0.5);

        let green = rgb_to_hsl([0, 255, 0]);
        assert!((green.h - 1.0 / 3.0).abs() < 1e-12);

        let blue = rgb_to_hsl([0, 0, 255]);
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_to_hsl_achromatic() {
        let gray = rgb_to_hsl([128, 128, 128]);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!((gray.l - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_to_hsl_tie_prefers_red() {
        // Yellow: red and green both max, red sector wins -> hue 1/6
        let yellow = rgb_to_hsl([255, 255, 0]);
        assert!((yellow.h - 1.0 / 6.0).abs() < 1e-12);

        // Cyan: green and blue both max, green sector wins -> hue 1/2
        let cyan = rgb_to_hsl([0, 255, 255]);
        assert!((cyan.h - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_hsl_to_rgb_achromatic_short_circuit() {
        let px = hsl_to_rgb(Hsl { h: 0.7, s: 0.0, l: 0.5 });
        assert_eq!(px, [127, 127, 127]);
    }

    #[test]
    fn test_change_light_clamps() {
        assert_eq!(change_light([10, 20, 30], 100), [255, 255, 255]);
        assert_eq!(change_light([200, 100, 50], -100), [0, 0, 0]);
    }

    #[test]
    fn test_change_light_brightens() {
        let before = rgb_to_hsl([100, 60, 40]).l;
        let after = rgb_to_hsl(change_light([100, 60, 40], 20)).l;
        assert!((after - before - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_hue_shift_red_to_cyan() {
        let out = hue_shift([255, 0, 0], 50.0);
        assert_eq!(out[0], 0);
        assert!(out[1] >= 254);
        assert!(out[2] >= 254);
    }

    #[test]
    fn test_hue_shift_negative_folds_through_abs() {
        // hue 0 shifted by -30 -> |-30| mod 100 = 30, not 70
        let out = hue_shift([255, 0, 0], -30.0);
        let h = rgb_to_hsl(out).h;
        assert!((h - 0.30).abs() < 0.01, "hue {}", h);
    }

    #[test]
    fn test_hue_shift_wraps_past_full_turn() {
        // hue 0.5 (cyan) + 60 -> 110 mod 100 = 10
        let out = hue_shift([0, 255, 255], 60.0);
        let h = rgb_to_hsl(out).h;
        assert!((h - 0.10).abs() < 0.01, "hue {}", h);
    }

    #[test]
    fn test_hue_shift_huge_negative_does_not_overflow() {
        // Saturates to i64::MIN before folding through the absolute value.
        let huge = hue_shift([255, 0, 0], -1e19);
        let infinite = hue_shift([255, 0, 0], f64::NEG_INFINITY);
        assert_eq!(huge, infinite);

        // |i64::MIN| mod 100 = 8
        let h = rgb_to_hsl(huge).h;
        assert!((h - 0.08).abs() < 0.01, "hue {}", h);
    }

    #[test]
    fn test_hue_shift_image_gray_unchanged() {
        let mut img = PixelBuffer::filled(3, 2, [90, 90, 90]).unwrap();
        hue_shift_image(&mut img, 37.0);
        assert_eq!(img.pixel(1, 1), [90, 90, 90]);
    }
}
