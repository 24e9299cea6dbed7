//! Effect pipeline: runs a configured chain of filters over one image.
//!
//! Step order is fixed:
//!
//! 1. per-pixel adjustments (lightness, contrast, hue shift, invert, sine shift)
//! 2. mirror
//! 3. RGB shift
//! 4. pixel sort preset
//! 5. blur, then sharpen
//! 6. corrupt
//! 7. grayscale
//! 8. anaglyph
//! 9. edge detection (the edge map replaces the image)
//!
//! Zero or `false` configuration fields skip their step, so
//! `EffectConfig::default()` leaves the image unchanged.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::color_adjust::{contrast, invert, sine_color_shift, SineShift};
use crate::filters::color_science::{change_light, hue_shift};
use crate::filters::convolve::{convolve, Kernel};
use crate::filters::corrupt::corrupt;
use crate::filters::edge::detect_edges;
use crate::filters::geometry::{anaglyph_3d, mirror, rgb_shift, MirrorType, RgbShift};
use crate::filters::grayscale::grayscale_image;
use crate::filters::pixelsort::{pixel_sort, BoundMode, PixelSortOptions, Range, SortDirection, SortMetric};
use crate::image::PixelBuffer;

// ============================================================================
// Pixel Sort Presets
// ============================================================================

/// Named pixel sort settings tuned for different kinds of pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelSortPreset {
    #[default]
    None,
    /// Large objects and landscapes.
    Landscape,
    /// Detailed close-ups.
    Macro,
    /// Images with few distinct colors.
    #[serde(alias = "fewcolors")]
    FewColors,
    AllRandom,
    /// Emphasizes dark areas.
    Dark,
    /// Sorts between detected vertical edges.
    Edges,
}

fn lightness_preset(bottom: Range, top: Range, interval: Range, merge: f64) -> PixelSortOptions {
    PixelSortOptions {
        metric: SortMetric::Lightness,
        threshold_mode: BoundMode::Random,
        bottom,
        top,
        interval_mode: BoundMode::Random,
        interval,
        merge,
        direction: SortDirection::Ascending,
    }
}

impl PixelSortPreset {
    /// Concrete options for an image `width` pixels wide.
    ///
    /// Interval bounds scale with the width. `AllRandom` draws its merge
    /// factor from `rng`; the other presets are deterministic. Returns
    /// `None` for [`PixelSortPreset::None`].
    pub fn to_options<R: Rng + ?Sized>(self, width: usize, rng: &mut R) -> Option<PixelSortOptions> {
        let w = width as i32;
        let options = match self {
            PixelSortPreset::None => return None,
            PixelSortPreset::Landscape => {
                lightness_preset(Range::new(0, 10), Range::new(0, 70), Range::new(w / 10, w / 5), 1.0)
            }
            PixelSortPreset::Macro => {
                lightness_preset(Range::new(0, 70), Range::new(0, 100), Range::new(w / 40, w / 35), 1.0)
            }
            PixelSortPreset::FewColors => {
                lightness_preset(Range::new(0, 10), Range::new(0, 70), Range::new(w / 30, w / 20), 0.5)
            }
            PixelSortPreset::AllRandom => {
                let merge = 0.5 / rng.gen_range(1..=4) as f64;
                lightness_preset(Range::new(0, 100), Range::new(0, 100), Range::new(w / 40, w / 5), merge)
            }
            PixelSortPreset::Dark => PixelSortOptions {
                metric: SortMetric::RgbSum,
                threshold_mode: BoundMode::Fixed,
                bottom: Range::fixed(1),
                top: Range::fixed(50),
                interval_mode: BoundMode::Random,
                interval: Range::new(w / 30, w / 20),
                merge: 1.0,
                direction: SortDirection::Ascending,
            },
            PixelSortPreset::Edges => PixelSortOptions::edges(),
        };
        Some(options)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Which effects to apply and with what strength.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EffectConfig {
    /// Lightness change in percent, -100..100.
    pub lightness: i32,
    /// Contrast level, roughly -255..255.
    pub contrast: i32,
    /// Hue rotation in hundredths of a turn.
    pub hue_shift: i32,
    /// Frequency of the sine color shift.
    pub sine_color_shift: f64,
    pub invert: bool,
    pub mirror: MirrorType,
    pub rgb_shift: RgbShift,
    pub pixel_sort: PixelSortPreset,
    /// Number of blur passes.
    pub blur: u32,
    /// Number of sharpen passes.
    pub sharpen: u32,
    pub corrupt: bool,
    pub grayscale: bool,
    #[serde(rename = "3d", alias = "anaglyph-3d")]
    pub anaglyph_3d: bool,
    pub edge_detect: bool,
}

impl EffectConfig {
    fn has_pixel_adjustments(&self) -> bool {
        self.lightness != 0
            || self.contrast != 0
            || self.hue_shift != 0
            || self.invert
            || self.sine_color_shift != 0.0
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelineReport {
    /// Segments sorted by the preset pixel sort and by corrupt.
    pub sorts: usize,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run every enabled step of `config` over `image`.
///
/// # Arguments
/// * `image` - Buffer modified in place; replaced by the edge map when
///   `edge_detect` is set
/// * `config` - Enabled effects
/// * `rng` - Randomness for pixel sort presets and corrupt
pub fn apply_effects<R: Rng + ?Sized>(
    image: &mut PixelBuffer,
    config: &EffectConfig,
    rng: &mut R,
) -> Result<PipelineReport> {
    let mut report = PipelineReport::default();

    if config.has_pixel_adjustments() {
        log::info!("applying per-pixel adjustments");
        let sine = SineShift::with_frequency(config.sine_color_shift);
        image.map_pixels(|mut px| {
            if config.lightness != 0 {
                px = change_light(px, config.lightness);
            }
            if config.contrast != 0 {
                px = contrast(px, config.contrast as f64);
            }
            if config.hue_shift != 0 {
                px = hue_shift(px, config.hue_shift as f64);
            }
            if config.invert {
                px = invert(px);
            }
            if config.sine_color_shift != 0.0 {
                px = sine_color_shift(px, sine);
            }
            px
        });
    }

    if config.mirror != MirrorType::None {
        log::info!("mirror: {:?}", config.mirror);
        mirror(image, config.mirror);
    }

    if !config.rgb_shift.is_zero() {
        log::info!("rgb shift: {:?}", config.rgb_shift);
        rgb_shift(image, &config.rgb_shift);
    }

    if let Some(options) = config.pixel_sort.to_options(image.width(), rng) {
        log::info!("pixel sort preset: {:?}", config.pixel_sort);
        report.sorts += pixel_sort(image, &options, rng)?;
    }

    if config.blur > 0 {
        log::info!("blur: {} pass(es)", config.blur);
        convolve(image, &Kernel::blur(), config.blur)?;
    }

    if config.sharpen > 0 {
        log::info!("sharpen: {} pass(es)", config.sharpen);
        convolve(image, &Kernel::sharpen(), config.sharpen)?;
    }

    if config.corrupt {
        log::info!("corrupt");
        report.sorts += corrupt(image, rng)?;
    }

    if config.grayscale {
        log::info!("grayscale");
        grayscale_image(image);
    }

    if config.anaglyph_3d {
        log::info!("anaglyph 3d");
        anaglyph_3d(image);
    }

    if config.edge_detect {
        log::info!("edge detection");
        *image = detect_edges(image)?;
    }

    Ok(report)
}
