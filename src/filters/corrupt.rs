//! Randomized "corrupt" glitch effect.
//!
//! Chains several filters with randomly drawn parameters:
//!
//! 1. lightness, contrast and hue shift on every pixel
//! 2. three diagonal mirrors of random top-left regions
//! 3. a random RGB shift
//! 4. a lightness pixel sort with the widest random settings
//!
//! All randomness comes from the caller's generator, so a seeded generator
//! reproduces the result exactly.

use rand::Rng;

use crate::error::Result;
use crate::filters::color_adjust::contrast;
use crate::filters::color_science::{change_light, hue_shift};
use crate::filters::geometry::{mirror_diagonal_region, rgb_shift, RgbShift};
use crate::filters::math::clamp;
use crate::filters::pixelsort::{pixel_sort, BoundMode, PixelSortOptions, Range, SortDirection, SortMetric};
use crate::image::PixelBuffer;

const MIRROR_PASSES: usize = 3;

/// Uniform in `[0, bound)`, or 0 when the bound is empty.
fn below<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> i32 {
    if bound == 0 {
        0
    } else {
        rng.gen_range(0..bound) as i32
    }
}

/// Side of a mirrored region: 10 to 30 percent of `extent`.
fn region_side<R: Rng + ?Sized>(rng: &mut R, extent: usize) -> usize {
    let percent = rng.gen_range(10..=30) as f64 / 100.0;
    (extent as f64 * percent) as usize
}

/// Pixel sort settings with random thresholds, interval and merge.
fn random_sort_options<R: Rng + ?Sized>(rng: &mut R, width: usize) -> PixelSortOptions {
    let interval_min = (width / rng.gen_range(5..=20)) as i32;
    let interval_max = clamp(
        (width / rng.gen_range(5..=20)) as f64,
        (interval_min + 1) as f64,
        width as f64,
    ) as i32;
    let merge = rng.gen_range(0..100) as f64 / 100.0;

    PixelSortOptions {
        metric: SortMetric::Lightness,
        threshold_mode: BoundMode::Random,
        bottom: Range::new(1, 100),
        top: Range::new(1, 100),
        interval_mode: BoundMode::Random,
        interval: Range::new(interval_min, interval_max),
        merge,
        direction: SortDirection::Ascending,
    }
}

/// Apply the corrupt effect in place.
///
/// # Returns
/// Number of segments sorted by the final pixel sort.
pub fn corrupt<R: Rng + ?Sized>(image: &mut PixelBuffer, rng: &mut R) -> Result<usize> {
    let (width, height) = (image.width(), image.height());

    let light = rng.gen_range(-25..30);
    let level = rng.gen_range(-25..=25) as f64;
    let hue = rng.gen_range(-100..=100) as f64;
    image.map_pixels(|px| hue_shift(contrast(change_light(px, light), level), hue));

    for _ in 0..MIRROR_PASSES {
        let region_w = region_side(rng, width);
        let region_h = region_side(rng, height);
        mirror_diagonal_region(image, region_w, region_h);
    }

    let shift = RgbShift {
        red_x: below(rng, width / 5),
        red_y: below(rng, height / 3),
        green_x: below(rng, width / 5),
        green_y: below(rng, height / 3),
        blue_x: below(rng, width / 5),
        blue_y: below(rng, height / 3),
    };
    rgb_shift(image, &shift);

    let options = random_sort_options(rng, width);
    log::debug!(
        "corrupt: light {}, contrast {}, hue {}, shift {:?}, interval {}..={}, merge {}",
        light,
        level,
        hue,
        shift,
        options.interval.min,
        options.interval.max,
        options.merge
    );
    pixel_sort(image, &options, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noise(width: usize, height: usize, seed: u64) -> PixelBuffer {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut img = PixelBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, [rng.gen(), rng.gen(), rng.gen()]);
            }
        }
        img
    }

    #[test]
    fn test_corrupt_is_reproducible() {
        let mut a = noise(48, 32, 11);
        let mut b = a.clone();
        let sorts_a = corrupt(&mut a, &mut StdRng::seed_from_u64(2024)).unwrap();
        let sorts_b = corrupt(&mut b, &mut StdRng::seed_from_u64(2024)).unwrap();

        assert_eq!(sorts_a, sorts_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_corrupt_changes_image() {
        let original = noise(48, 32, 12);
        let mut img = original.clone();
        corrupt(&mut img, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(img.width(), 48);
        assert_eq!(img.height(), 32);
        assert_ne!(img, original);
    }

    #[test]
    fn test_corrupt_tiny_image() {
        // Bounds of w/5 and h/3 are zero here; shifts fall back to 0.
        let mut img = noise(2, 2, 13);
        assert!(corrupt(&mut img, &mut StdRng::seed_from_u64(3)).is_ok());
    }

    #[test]
    fn test_random_sort_options_are_valid() {
        let mut rng = StdRng::seed_from_u64(8);
        for width in [1usize, 4, 5, 19, 100, 1920] {
            let options = random_sort_options(&mut rng, width);
            assert!(options.validate().is_ok(), "width {}", width);
            assert!(options.interval.max <= width.max(1) as i32);
            assert!((0.0..1.0).contains(&options.merge));
        }
    }
}
