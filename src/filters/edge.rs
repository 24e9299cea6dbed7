//! Vertical edge detection.
//!
//! The detector is a fixed chain of convolutions and threshold passes:
//!
//! 1. blur (smooths sensor noise)
//! 2. vertical line kernel (responds to left/right intensity changes)
//! 3. `set_white(9)` per channel
//! 4. blur again
//! 5. `sharp_grayscale` to a binary map
//!
//! Output is black everywhere except white (255, 255, 255) where a vertical
//! edge was found. The pixel sort uses the red channel of this map as its
//! segment trigger.

use crate::error::Result;
use crate::filters::convolve::{convolve, Kernel};
use crate::filters::grayscale::{set_white, sharp_grayscale};
use crate::image::PixelBuffer;

/// Channel level above which a vertical-line response counts as an edge.
const EDGE_THRESHOLD: i32 = 9;

/// Detect vertical edges and return a binary edge map.
///
/// Works on a copy; the input buffer is left untouched.
///
/// # Returns
/// Buffer of the same size, white on edges and black elsewhere.
pub fn detect_edges(image: &PixelBuffer) -> Result<PixelBuffer> {
    let mut edges = image.try_clone()?;

    convolve(&mut edges, &Kernel::blur(), 1)?;
    convolve(&mut edges, &Kernel::vertical_line(), 1)?;
    edges.map_pixels(|px| set_white(px, EDGE_THRESHOLD));
    convolve(&mut edges, &Kernel::blur(), 1)?;
    edges.map_pixels(sharp_grayscale);

    log::debug!("edge map computed for {}x{} image", edges.width(), edges.height());
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image_has_no_edges() {
        let img = PixelBuffer::filled(8, 5, [120, 40, 200]).unwrap();
        let edges = detect_edges(&img).unwrap();
        for y in 0..5 {
            for x in 0..8 {
                assert_eq!(edges.pixel(x, y), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn test_input_left_untouched() {
        let mut img = PixelBuffer::new(6, 3).unwrap();
        img.set_pixel(2, 1, [255, 255, 255]);
        let before = img.clone();
        let _ = detect_edges(&img).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_vertical_stripe_is_detected() {
        // White stripe three columns wide on black.
        let mut img = PixelBuffer::new(11, 4).unwrap();
        for y in 0..4 {
            for x in 3..6 {
                img.set_pixel(x, y, [255, 255, 255]);
            }
        }
        let edges = detect_edges(&img).unwrap();

        for y in 0..4 {
            for x in 0..11 {
                let expected = if (3..6).contains(&x) { [255; 3] } else { [0; 3] };
                assert_eq!(edges.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_thin_line_is_smoothed_away() {
        // A single-pixel line falls below mid-gray after the second blur.
        let mut img = PixelBuffer::new(9, 3).unwrap();
        for y in 0..3 {
            img.set_pixel(4, y, [255, 255, 255]);
        }
        let edges = detect_edges(&img).unwrap();
        assert_eq!(edges.pixel(4, 1), [0, 0, 0]);
    }
}
