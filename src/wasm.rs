//! WebAssembly exports for pixelglitch effects.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Images cross the boundary as flat RGB byte arrays
//! (length = width * height * 3). Randomized effects take an explicit seed so
//! the same call always produces the same image. Errors are raised as
//! JavaScript exceptions carrying the error message.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::color_adjust::{contrast_image, invert_image, sine_color_shift_image, SineShift};
use crate::filters::color_science::{change_light_image, hue_shift_image};
use crate::filters::convolve::{convolve, Kernel};
use crate::filters::corrupt::corrupt;
use crate::filters::edge::detect_edges;
use crate::filters::geometry::{anaglyph_3d, rgb_shift, RgbShift};
use crate::filters::grayscale::grayscale_image;
use crate::filters::pixelsort::pixel_sort;
use crate::image::PixelBuffer;
use crate::pipeline::{apply_effects, EffectConfig, PixelSortPreset};

fn js_error(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Wrap flat bytes, run `f` on the buffer, and flatten the result again.
fn with_buffer<F>(data: &[u8], width: usize, height: usize, f: F) -> Result<Vec<u8>, JsValue>
where
    F: FnOnce(&mut PixelBuffer) -> crate::error::Result<()>,
{
    let mut buffer = PixelBuffer::from_raw(width, height, data.to_vec()).map_err(js_error)?;
    f(&mut buffer).map_err(js_error)?;
    Ok(buffer.into_raw())
}

// ============================================================================
// Color Filters
// ============================================================================

/// Shift HSL lightness.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `percent` - Lightness change, -100..100
///
/// # Returns
/// Flat array of RGB bytes
#[wasm_bindgen]
pub fn lightness_wasm(data: &[u8], width: usize, height: usize, percent: i32) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        change_light_image(img, percent);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn contrast_wasm(data: &[u8], width: usize, height: usize, level: f64) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        contrast_image(img, level);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn hue_shift_wasm(data: &[u8], width: usize, height: usize, value: f64) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        hue_shift_image(img, value);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn invert_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        invert_image(img);
        Ok(())
    })
}

/// Sine color shift with amplifier 0.5, phase 90 and bias 1.
#[wasm_bindgen]
pub fn sine_color_shift_wasm(data: &[u8], width: usize, height: usize, frequency: f64) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        sine_color_shift_image(img, SineShift::with_frequency(frequency));
        Ok(())
    })
}

#[wasm_bindgen]
pub fn grayscale_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        grayscale_image(img);
        Ok(())
    })
}

// ============================================================================
// Convolution & Edges
// ============================================================================

#[wasm_bindgen]
pub fn blur_wasm(data: &[u8], width: usize, height: usize, times: u32) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| convolve(img, &Kernel::blur(), times))
}

#[wasm_bindgen]
pub fn sharpen_wasm(data: &[u8], width: usize, height: usize, times: u32) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| convolve(img, &Kernel::sharpen(), times))
}

/// Binary vertical edge map, white on edges.
#[wasm_bindgen]
pub fn detect_edges_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        *img = detect_edges(img)?;
        Ok(())
    })
}

// ============================================================================
// Geometry
// ============================================================================

/// Rotate each channel along rows by its x amount, then along columns by
/// its y amount.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn rgb_shift_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    red_x: i32,
    red_y: i32,
    green_x: i32,
    green_y: i32,
    blue_x: i32,
    blue_y: i32,
) -> Result<Vec<u8>, JsValue> {
    let shift = RgbShift { red_x, red_y, green_x, green_y, blue_x, blue_y };
    with_buffer(data, width, height, |img| {
        rgb_shift(img, &shift);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn anaglyph_3d_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    with_buffer(data, width, height, |img| {
        anaglyph_3d(img);
        Ok(())
    })
}

// ============================================================================
// Randomized Effects
// ============================================================================

/// Pixel sort with a named preset (`"landscape"`, `"edges"`, ...).
#[wasm_bindgen]
pub fn pixel_sort_wasm(data: &[u8], width: usize, height: usize, preset: &str, seed: u64) -> Result<Vec<u8>, JsValue> {
    let preset: PixelSortPreset = serde_json::from_value(serde_json::Value::String(preset.to_string()))
        .map_err(|_| JsValue::from_str(&format!("unknown pixel sort preset: {:?}", preset)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    with_buffer(data, width, height, |img| {
        if let Some(options) = preset.to_options(img.width(), &mut rng) {
            pixel_sort(img, &options, &mut rng)?;
        }
        Ok(())
    })
}

#[wasm_bindgen]
pub fn corrupt_wasm(data: &[u8], width: usize, height: usize, seed: u64) -> Result<Vec<u8>, JsValue> {
    let mut rng = StdRng::seed_from_u64(seed);
    with_buffer(data, width, height, |img| corrupt(img, &mut rng).map(|_| ()))
}

/// Run the effect pipeline described by a JSON object with kebab-case keys.
#[wasm_bindgen]
pub fn apply_effects_wasm(data: &[u8], width: usize, height: usize, config: &str, seed: u64) -> Result<Vec<u8>, JsValue> {
    let config: EffectConfig = serde_json::from_str(config)
        .map_err(|e| JsValue::from_str(&format!("invalid effect config: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);
    with_buffer(data, width, height, |img| apply_effects(img, &config, &mut rng).map(|_| ()))
}
