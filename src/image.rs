//! Owned RGB pixel grid.
//!
//! Pixels live in an `Array3<u8>` of shape `(height, width, 3)` in standard
//! (row-major) layout, so `[[y, x, c]]` indexing is bounds-checked and a row
//! is a contiguous `(width, 3)` lane.

use ndarray::parallel::prelude::*;
use ndarray::{s, Array3, ArrayViewMut2, Axis};

use crate::error::{FilterError, Result};

/// One pixel: red, green, blue.
pub type Rgb = [u8; 3];

/// Number of channels per pixel.
pub const CHANNELS: usize = 3;

/// Color channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// A width × height grid of 8-bit RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Allocate a black buffer.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let data = alloc_bytes(width, height)?;
        Self::from_raw(width, height, data)
    }

    /// Allocate a buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self> {
        let mut buffer = Self::new(width, height)?;
        buffer.map_pixels(|_| color);
        Ok(buffer)
    }

    /// Wrap raw interleaved RGB bytes (row-major, `width * height * 3` long).
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        check_dims(width, height)?;
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(FilterError::InvalidDimensions(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|e| FilterError::InvalidDimensions(e.to_string()))?;
        Ok(PixelBuffer { data })
    }

    /// Take ownership of an `(height, width, 3)` array.
    pub fn from_array(array: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = array.dim();
        check_dims(width, height)?;
        if channels != CHANNELS {
            return Err(FilterError::InvalidDimensions(format!(
                "expected 3 channels, got {}",
                channels
            )));
        }
        // Normalize to standard layout so rows are contiguous.
        let data = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };
        Ok(PixelBuffer { data })
    }

    /// Copy into a freshly allocated buffer, reporting allocation failure.
    pub fn try_clone(&self) -> Result<Self> {
        let mut bytes = alloc_bytes(self.width(), self.height())?;
        for (dst, src) in bytes.iter_mut().zip(self.data.iter()) {
            *dst = *src;
        }
        Self::from_raw(self.width(), self.height(), bytes)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: Rgb) {
        for (c, &v) in rgb.iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    /// Swap two pixels given as `(x, y)` coordinates.
    #[inline]
    pub fn swap_pixels(&mut self, a: (usize, usize), b: (usize, usize)) {
        for c in 0..CHANNELS {
            self.data.swap([a.1, a.0, c], [b.1, b.0, c]);
        }
    }

    /// Apply `f` to every pixel in place. Rows are processed in parallel.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(Rgb) -> Rgb + Sync,
    {
        self.data
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut row| {
                for mut px in row.outer_iter_mut() {
                    let out = f([px[0], px[1], px[2]]);
                    px[0] = out[0];
                    px[1] = out[1];
                    px[2] = out[2];
                }
            });
    }

    /// Row `y` as a mutable `(width, 3)` view.
    pub fn row_mut(&mut self, y: usize) -> ArrayViewMut2<'_, u8> {
        self.data.slice_mut(s![y, .., ..])
    }

    /// Column `x` as a mutable `(height, 3)` view.
    pub fn column_mut(&mut self, x: usize) -> ArrayViewMut2<'_, u8> {
        self.data.slice_mut(s![.., x, ..])
    }

    pub(crate) fn array(&self) -> &Array3<u8> {
        &self.data
    }

    pub(crate) fn array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved RGB bytes, row-major.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }
}

fn check_dims(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions(format!(
            "image must be non-empty, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Reserve a zeroed `width * height * 3` byte vector without aborting on OOM.
pub(crate) fn alloc_bytes(width: usize, height: usize) -> Result<Vec<u8>> {
    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(FilterError::Allocation { width, height })?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| FilterError::Allocation { width, height })?;
    bytes.resize(len, 0);
    Ok(bytes)
}
