//! Pixel sort: reorder runs of pixels within each scanline.
//!
//! Two segment selection strategies are supported:
//!
//! - **Threshold**: a column whose metric (HSL lightness × 100 or R+G+B)
//!   lies between a lower and an upper threshold triggers a sort of the
//!   `interval` pixels to its left. The cursor then skips ahead by
//!   `interval × merge` columns.
//! - **Edges**: a vertical edge map is computed once; every edge column
//!   closes a segment that started at the previous edge (or the row start).
//!
//! Segments never include the triggering column itself.
//!
//! Thresholds and intervals are either fixed (the lower bound of their
//! range) or drawn uniformly from `[min, max]` on every evaluation, using
//! the caller's random number generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::filters::color_science::rgb_to_hsl;
use crate::filters::edge::detect_edges;
use crate::filters::math::{sort_by_key, SortKey};
use crate::image::{PixelBuffer, Rgb};

// ============================================================================
// Options
// ============================================================================

/// Scalar that decides which pixels trigger a sort and how segments order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMetric {
    /// R + G + B, 0..=765.
    RgbSum,
    /// HSL lightness, compared as a percentage.
    Lightness,
    /// Segments delimited by detected vertical edges, ordered by lightness.
    Edges,
}

/// How a value is taken from a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundMode {
    /// Always the range minimum.
    Fixed,
    /// Uniform in `[min, max]`, redrawn on every evaluation.
    Random,
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl Range {
    pub fn new(min: i32, max: i32) -> Self {
        Range { min, max }
    }

    /// Single-value range.
    pub fn fixed(value: i32) -> Self {
        Range { min: value, max: value }
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        if self.min > self.max {
            return Err(FilterError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    #[inline]
    fn draw<R: Rng + ?Sized>(&self, mode: BoundMode, rng: &mut R) -> i32 {
        match mode {
            BoundMode::Fixed => self.min,
            BoundMode::Random => rng.gen_range(self.min..=self.max),
        }
    }
}

/// Order in which sorted pixels are written back into a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    /// Smallest metric at the segment start.
    #[default]
    Ascending,
    /// Largest metric at the segment start.
    Descending,
}

/// Full configuration of one pixel sort run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PixelSortOptions {
    pub metric: SortMetric,
    pub threshold_mode: BoundMode,
    /// Lower threshold range.
    pub bottom: Range,
    /// Upper threshold range.
    pub top: Range,
    pub interval_mode: BoundMode,
    pub interval: Range,
    /// Fraction of the interval skipped after each sort.
    pub merge: f64,
    #[serde(default)]
    pub direction: SortDirection,
}

impl PixelSortOptions {
    /// Edge-triggered sort; thresholds and interval are unused.
    pub fn edges() -> Self {
        PixelSortOptions {
            metric: SortMetric::Edges,
            threshold_mode: BoundMode::Fixed,
            bottom: Range::fixed(0),
            top: Range::fixed(0),
            interval_mode: BoundMode::Fixed,
            interval: Range::fixed(0),
            merge: 0.0,
            direction: SortDirection::Ascending,
        }
    }

    /// Reject random ranges that cannot be sampled.
    ///
    /// An upper threshold below the lower one is accepted; it simply never
    /// triggers.
    pub fn validate(&self) -> Result<()> {
        if self.metric == SortMetric::Edges {
            return Ok(());
        }
        if self.threshold_mode == BoundMode::Random {
            self.bottom.validate("bottom threshold")?;
            self.top.validate("top threshold")?;
        }
        if self.interval_mode == BoundMode::Random {
            self.interval.validate("interval")?;
        }
        Ok(())
    }
}

// ============================================================================
// Splice
// ============================================================================

/// Sort `keys` and write the referenced pixels of row `y` into
/// `[start, end)` in the given direction.
///
/// `keys` must hold exactly `end - start` entries whose indices are columns
/// of row `y`.
pub fn splice(
    image: &mut PixelBuffer,
    y: usize,
    keys: &mut [SortKey],
    start: usize,
    end: usize,
    direction: SortDirection,
) {
    debug_assert_eq!(keys.len(), end - start);
    sort_by_key(keys);

    let sorted: Vec<Rgb> = keys.iter().map(|k| image.pixel(k.index, y)).collect();
    let mut row = image.row_mut(y);
    for (offset, x) in (start..end).enumerate() {
        let px = match direction {
            SortDirection::Ascending => sorted[offset],
            SortDirection::Descending => sorted[sorted.len() - 1 - offset],
        };
        for (c, &v) in px.iter().enumerate() {
            row[[x, c]] = v;
        }
    }
}

// ============================================================================
// Pixel Sort
// ============================================================================

#[inline]
fn lightness(px: Rgb) -> f64 {
    rgb_to_hsl(px).l
}

#[inline]
fn rgb_sum(px: Rgb) -> f64 {
    (px[0] as u32 + px[1] as u32 + px[2] as u32) as f64
}

/// (metric, column) keys for `[start, end)` of row `y`, read from the
/// current buffer.
fn segment_keys(image: &PixelBuffer, y: usize, start: usize, end: usize, metric: fn(Rgb) -> f64) -> Vec<SortKey> {
    (start..end)
        .map(|x| SortKey::new(metric(image.pixel(x, y)), x))
        .collect()
}

/// Run a pixel sort over every row of `image`.
///
/// # Arguments
/// * `image` - Buffer sorted in place
/// * `options` - Segment selection and ordering
/// * `rng` - Source for random thresholds and intervals
///
/// # Returns
/// Number of segments sorted (empty segments included).
pub fn pixel_sort<R: Rng + ?Sized>(
    image: &mut PixelBuffer,
    options: &PixelSortOptions,
    rng: &mut R,
) -> Result<usize> {
    options.validate()?;

    let sorts = match options.metric {
        SortMetric::Edges => sort_by_edges(image, options.direction)?,
        SortMetric::Lightness | SortMetric::RgbSum => sort_by_threshold(image, options, rng),
    };

    log::debug!("pixel sort ({:?}) performed {} sorts", options.metric, sorts);
    Ok(sorts)
}

fn sort_by_edges(image: &mut PixelBuffer, direction: SortDirection) -> Result<usize> {
    let edges = detect_edges(image)?;
    let mut sorts = 0;

    for y in 0..image.height() {
        let mut last = 0;
        for x in 0..image.width() {
            if edges.pixel(x, y)[0] != 255 {
                continue;
            }
            let mut keys = segment_keys(image, y, last, x, lightness);
            splice(image, y, &mut keys, last, x, direction);
            sorts += 1;
            last = x;
        }
    }
    Ok(sorts)
}

fn sort_by_threshold<R: Rng + ?Sized>(image: &mut PixelBuffer, options: &PixelSortOptions, rng: &mut R) -> usize {
    let (metric, scale): (fn(Rgb) -> f64, f64) = match options.metric {
        SortMetric::RgbSum => (rgb_sum, 1.0),
        _ => (lightness, 100.0),
    };
    let width = image.width();
    let mut sorts = 0;

    for y in 0..image.height() {
        let mut x = 0;
        while x < width {
            let top = options.top.draw(options.threshold_mode, rng) as f64;
            let bottom = options.bottom.draw(options.threshold_mode, rng) as f64;

            let value = metric(image.pixel(x, y)) * scale;
            if value >= bottom && value <= top {
                let mut interval = options.interval.draw(options.interval_mode, rng) as i64;
                if interval < 0 {
                    interval = x as i64;
                }
                let start = (x as i64 - interval).max(0) as usize;

                let mut keys = segment_keys(image, y, start, x, metric);
                splice(image, y, &mut keys, start, x, options.direction);
                sorts += 1;

                // Negative merge would walk backwards forever
                let skip = (interval as f64 * options.merge) as i64;
                x += skip.max(0) as usize;
            }
            x += 1;
        }
    }
    sorts
}
