//! Filter modules for glitch effects.
//!
//! ## Supported Format
//!
//! Every filter works on a [`PixelBuffer`](crate::image::PixelBuffer):
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! There is no alpha channel and no float variant.
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: invert, contrast, sine color shift, grayscale, set_white
//! - **Color science**: RGB <-> HSL, lightness, hue_shift
//! - **Convolution**: blur, sharpen, vertical line, custom kernels
//! - **Edge detection**: binary vertical edge map
//! - **Pixel sort**: threshold- or edge-triggered scanline sorting
//! - **Geometry**: mirrors, channel rotation, RGB shift, anaglyph
//! - **Composite**: corrupt
//!
//! Pixel-wise filters and convolution rows run in parallel with rayon.
//! Filters that draw random numbers take the generator as a parameter and
//! stay sequential, so a seeded generator gives reproducible output.

pub mod math;

pub mod color_adjust;
pub mod color_science;
pub mod grayscale;

pub mod convolve;
pub mod edge;

pub mod geometry;
pub mod pixelsort;

pub mod corrupt;
