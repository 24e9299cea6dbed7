//! 2D kernel convolution with replicate-border sampling.
//!
//! The kernel is applied as a true convolution (spatially reversed): the
//! weight at row `r`, column `c` multiplies the sample at offset
//! `(center_y - r, center_x - c)` from the output pixel. Samples outside the
//! image are clamped to the nearest edge pixel.
//!
//! Each pass reads only the buffer produced by the previous pass, so there
//! is no feedback within a pass. Rows of a pass are computed in parallel;
//! every output value depends on the source buffer alone, so the result is
//! the same for any scheduling.

use rayon::prelude::*;
use ndarray::{Array2, Array3, Axis};

use crate::error::{FilterError, Result};
use crate::filters::math::clamp;
use crate::image::{alloc_bytes, PixelBuffer, CHANNELS};

// ============================================================================
// Kernel
// ============================================================================

/// Integer weight matrix with a scalar multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Weights, shape `(size_y, size_x)`.
    weights: Array2<i32>,
    multiplier: f64,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// Both dimensions must be odd so the kernel has a unique center cell.
    pub fn new(weights: &[i32], size_x: usize, size_y: usize, multiplier: f64) -> Result<Self> {
        if size_x == 0 || size_y == 0 || size_x % 2 == 0 || size_y % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "dimensions must be odd, got {}x{}",
                size_x, size_y
            )));
        }
        if weights.len() != size_x * size_y {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} weights for {}x{}, got {}",
                size_x * size_y,
                size_x,
                size_y,
                weights.len()
            )));
        }
        let weights = Array2::from_shape_vec((size_y, size_x), weights.to_vec())
            .map_err(|e| FilterError::InvalidKernel(e.to_string()))?;
        Ok(Kernel { weights, multiplier })
    }

    fn fixed_3x3(weights: [i32; 9], multiplier: f64) -> Self {
        let weights = Array2::from_shape_fn((3, 3), |(r, c)| weights[r * 3 + c]);
        Kernel { weights, multiplier }
    }

    /// Passes every pixel through unchanged.
    pub fn identity() -> Self {
        Self::fixed_3x3([0, 0, 0, 0, 1, 0, 0, 0, 0], 1.0)
    }

    /// 3x3 Gaussian-like blur, `[1 2 1; 2 4 2; 1 2 1] / 16`.
    pub fn blur() -> Self {
        Self::fixed_3x3([1, 2, 1, 2, 4, 2, 1, 2, 1], 1.0 / 16.0)
    }

    /// 3x3 sharpen, `[0 -1 0; -1 5 -1; 0 -1 0]`.
    pub fn sharpen() -> Self {
        Self::fixed_3x3([0, -1, 0, -1, 5, -1, 0, -1, 0], 1.0)
    }

    /// Responds to vertical intensity ridges, `[-1 2 -1]` on every row.
    pub fn vertical_line() -> Self {
        Self::fixed_3x3([-1, 2, -1, -1, 2, -1, -1, 2, -1], 1.0)
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        self.weights.dim().1
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        self.weights.dim().0
    }

    #[inline]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> i32 {
        self.weights[[row, col]]
    }
}

// ============================================================================
// Convolution
// ============================================================================

/// Convolve `image` with `kernel`, `times` passes, in place.
///
/// A working buffer of the same size is allocated once and swapped with the
/// image after every pass. `times == 0` leaves the image untouched.
pub fn convolve(image: &mut PixelBuffer, kernel: &Kernel, times: u32) -> Result<()> {
    if times == 0 {
        return Ok(());
    }
    let (height, width) = (image.height(), image.width());
    let scratch = alloc_bytes(width, height)?;
    let mut scratch = Array3::from_shape_vec((height, width, CHANNELS), scratch)
        .map_err(|e| FilterError::InvalidDimensions(e.to_string()))?;

    for _ in 0..times {
        convolve_pass(image.array(), &mut scratch, kernel);
        std::mem::swap(image.array_mut(), &mut scratch);
    }

    log::debug!(
        "convolved {}x{} image with {}x{} kernel, {} pass(es)",
        width,
        height,
        kernel.size_x(),
        kernel.size_y(),
        times
    );
    Ok(())
}

/// One convolution pass from `src` into `dst` (same shape).
fn convolve_pass(src: &Array3<u8>, dst: &mut Array3<u8>, kernel: &Kernel) {
    let (height, width, _) = src.dim();
    let (size_y, size_x) = (kernel.size_y(), kernel.size_x());
    let center_y = (size_y / 2) as isize;
    let center_x = (size_x / 2) as isize;
    let max_y = height as f64 - 1.0;
    let max_x = width as f64 - 1.0;
    let multiplier = kernel.multiplier();

    dst.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                let mut sum = [0.0f64; CHANNELS];

                // Walk the kernel back to front so weight [r][c] meets the
                // sample mirrored through the center.
                for k in 0..size_y {
                    let kr = size_y - 1 - k;
                    let sy = y as isize + (center_y - kr as isize);
                    let sy = clamp(sy as f64, 0.0, max_y) as usize;

                    for l in 0..size_x {
                        let kc = size_x - 1 - l;
                        let sx = x as isize + (center_x - kc as isize);
                        let sx = clamp(sx as f64, 0.0, max_x) as usize;

                        let w = kernel.weight(kr, kc) as f64;
                        for (c, acc) in sum.iter_mut().enumerate() {
                            *acc += src[[sy, sx, c]] as f64 * multiplier * w;
                        }
                    }
                }

                for (c, acc) in sum.iter().enumerate() {
                    row[[x, c]] = clamp(*acc, 0.0, 255.0) as u8;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, [(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x * y) % 256) as u8]);
            }
        }
        img
    }

    #[test]
    fn test_kernel_rejects_even_size() {
        let err = Kernel::new(&[1, 1, 1, 1], 2, 2, 1.0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidKernel(_)));
        assert!(Kernel::new(&[1, 2, 3], 3, 3, 1.0).is_err());
        assert!(Kernel::new(&[1, 2, 3], 3, 1, 1.0).is_ok());
    }

    #[test]
    fn test_kernel_accessors() {
        let kernel = Kernel::new(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15], 5, 3, 0.5).unwrap();
        assert_eq!(kernel.size_x(), 5);
        assert_eq!(kernel.size_y(), 3);
        assert_eq!(kernel.weight(0, 4), 5);
        assert_eq!(kernel.weight(2, 0), 11);
        assert_eq!(kernel.multiplier(), 0.5);
        assert_eq!(Kernel::blur().multiplier(), 1.0 / 16.0);
    }

    #[test]
    fn test_identity_kernel_is_identity() {
        let original = gradient(7, 5);
        let mut img = original.clone();
        convolve(&mut img, &Kernel::identity(), 1).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_zero_passes_is_noop() {
        let original = gradient(4, 4);
        let mut img = original.clone();
        convolve(&mut img, &Kernel::blur(), 0).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_blur_uniform_is_fixed_point() {
        let mut img = PixelBuffer::filled(6, 4, [200, 13, 77]).unwrap();
        convolve(&mut img, &Kernel::blur(), 3).unwrap();
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(img.pixel(x, y), [200, 13, 77]);
            }
        }
    }

    #[test]
    fn test_kernel_is_spatially_reversed() {
        // Weight only at the right-hand cell: true convolution samples the
        // left neighbour, so the image shifts one pixel to the right.
        let kernel = Kernel::new(&[0, 0, 1], 3, 1, 1.0).unwrap();
        let mut img = PixelBuffer::new(4, 1).unwrap();
        for x in 0..4 {
            img.set_pixel(x, 0, [(x as u8 + 1) * 10; 3]);
        }
        convolve(&mut img, &kernel, 1).unwrap();

        let reds: Vec<u8> = (0..4).map(|x| img.pixel(x, 0)[0]).collect();
        // x = 0 clamps to itself
        assert_eq!(reds, vec![10, 10, 20, 30]);
    }

    #[test]
    fn test_border_replicates_edge() {
        // Vertical line kernel over a single column sees the same pixel on
        // both sides: -1 + 2 - 1 = 0 everywhere.
        let mut img = PixelBuffer::filled(1, 3, [90, 90, 90]).unwrap();
        convolve(&mut img, &Kernel::vertical_line(), 1).unwrap();
        assert_eq!(img.pixel(0, 1), [0, 0, 0]);
    }

    #[test]
    fn test_sharpen_clamps_to_byte_range() {
        let mut img = PixelBuffer::new(3, 3).unwrap();
        img.set_pixel(1, 1, [255, 255, 255]);
        convolve(&mut img, &Kernel::sharpen(), 1).unwrap();

        assert_eq!(img.pixel(1, 1), [255, 255, 255]);
        assert_eq!(img.pixel(0, 1), [0, 0, 0]);
    }

    #[test]
    fn test_repeat_reads_previous_pass() {
        let kernel = Kernel::new(&[0, 0, 1], 3, 1, 1.0).unwrap();
        let mut img = PixelBuffer::new(4, 1).unwrap();
        img.set_pixel(0, 0, [255, 0, 0]);
        convolve(&mut img, &kernel, 2).unwrap();

        // Two one-pixel shifts right, with the left edge replicated.
        let reds: Vec<u8> = (0..4).map(|x| img.pixel(x, 0)[0]).collect();
        assert_eq!(reds, vec![255, 255, 255, 0]);
    }
}
