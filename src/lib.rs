//! pixelglitch
//!
//! Glitch-art image effects on in-memory RGB buffers, with Python bindings
//! via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! A [`PixelBuffer`] is a `(height, width, 3)` grid of 8-bit RGB pixels.
//! There is no alpha channel. File decoding and encoding are left to the
//! caller.
//!
//! ## Effects
//! - Per-pixel color transforms in RGB and HSL
//! - Kernel convolution (blur, sharpen) with replicated borders
//! - Vertical edge detection
//! - Pixel sort, triggered by thresholds or by detected edges
//! - Mirrors, per-channel RGB shift, anaglyph
//! - The randomized corrupt effect and a configurable effect pipeline
//!
//! ## Randomness
//! Every randomized operation takes an explicit [`rand::Rng`]. Seeding it
//! (for example `StdRng::seed_from_u64`) makes output bit-reproducible.

pub mod error;
pub mod filters;
pub mod image;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use image::{Channel, PixelBuffer, Rgb};
pub use pipeline::{apply_effects, EffectConfig, PipelineReport, PixelSortPreset};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyMemoryError, PyValueError};
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::FilterError;
    use crate::filters::color_adjust::{self, SineShift};
    use crate::filters::color_science;
    use crate::filters::convolve::{self as convolve_mod, Kernel};
    use crate::filters::corrupt as corrupt_mod;
    use crate::filters::edge;
    use crate::filters::geometry::{self, MirrorType, RgbShift};
    use crate::filters::grayscale as grayscale_mod;
    use crate::filters::pixelsort;
    use crate::image::PixelBuffer;
    use crate::pipeline::{self, EffectConfig, PixelSortPreset};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::Allocation { .. } => PyMemoryError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(PixelBuffer::from_array(image.as_array().to_owned())?)
    }

    fn to_py(py: Python<'_>, buffer: PixelBuffer) -> Bound<'_, PyArray3<u8>> {
        buffer.into_array().into_pyarray(py)
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Parse a kebab-case name (`"diagonal"`, `"all-random"`, ...) into a
    /// serde enum.
    fn parse_name<T: serde::de::DeserializeOwned>(kind: &str, name: &str) -> PyResult<T> {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map_err(|_| PyValueError::new_err(format!("unknown {}: {:?}", kind, name)))
    }

    // ========================================================================
    // Color Filters
    // ========================================================================

    /// Shift HSL lightness by `percent` (-100..100).
    #[pyfunction]
    pub fn lightness<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, percent: i32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        color_science::change_light_image(&mut buffer, percent);
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    pub fn contrast<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, level: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        color_adjust::contrast_image(&mut buffer, level);
        Ok(to_py(py, buffer))
    }

    /// Rotate hue by `value` hundredths of a turn.
    #[pyfunction]
    pub fn hue_shift<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, value: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        color_science::hue_shift_image(&mut buffer, value);
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    pub fn invert<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        color_adjust::invert_image(&mut buffer);
        Ok(to_py(py, buffer))
    }

    /// Sinusoidal channel distortion.
    #[pyfunction]
    #[pyo3(signature = (image, frequency, amplifier=0.5, phase=90.0, bias=1.0))]
    pub fn sine_color_shift<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        frequency: f64,
        amplifier: f64,
        phase: f64,
        bias: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        let shift = SineShift { amplifier, frequency, phase, bias };
        color_adjust::sine_color_shift_image(&mut buffer, shift);
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    pub fn grayscale<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        grayscale_mod::grayscale_image(&mut buffer);
        Ok(to_py(py, buffer))
    }

    // ========================================================================
    // Convolution & Edges
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, times=1))]
    pub fn blur<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, times: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        convolve_mod::convolve(&mut buffer, &Kernel::blur(), times)?;
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    #[pyo3(signature = (image, times=1))]
    pub fn sharpen<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, times: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        convolve_mod::convolve(&mut buffer, &Kernel::sharpen(), times)?;
        Ok(to_py(py, buffer))
    }

    /// Convolve with a custom kernel.
    ///
    /// # Arguments
    /// * `weights` - Row-major integer weights, `size_x * size_y` long
    /// * `size_x`, `size_y` - Odd kernel dimensions
    /// * `multiplier` - Scale applied to every weight
    #[pyfunction]
    #[pyo3(signature = (image, weights, size_x, size_y, multiplier=1.0, times=1))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        weights: Vec<i32>,
        size_x: usize,
        size_y: usize,
        multiplier: f64,
        times: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = Kernel::new(&weights, size_x, size_y, multiplier)?;
        let mut buffer = to_buffer(image)?;
        convolve_mod::convolve(&mut buffer, &kernel, times)?;
        Ok(to_py(py, buffer))
    }

    /// Binary vertical edge map (white on edges).
    #[pyfunction]
    pub fn detect_edges<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(image)?;
        let edges = edge::detect_edges(&buffer)?;
        Ok(to_py(py, edges))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Mirror by name: `"diagonal"`, `"vertical"`, `"horizontal"` or `"none"`.
    #[pyfunction]
    pub fn mirror<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, kind: &str) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kind: MirrorType = parse_name("mirror type", kind)?;
        let mut buffer = to_buffer(image)?;
        geometry::mirror(&mut buffer, kind);
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    #[pyo3(signature = (image, red_x=0, red_y=0, green_x=0, green_y=0, blue_x=0, blue_y=0))]
    #[allow(clippy::too_many_arguments)]
    pub fn rgb_shift<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red_x: i32,
        red_y: i32,
        green_x: i32,
        green_y: i32,
        blue_x: i32,
        blue_y: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let shift = RgbShift { red_x, red_y, green_x, green_y, blue_x, blue_y };
        let mut buffer = to_buffer(image)?;
        geometry::rgb_shift(&mut buffer, &shift);
        Ok(to_py(py, buffer))
    }

    #[pyfunction]
    pub fn anaglyph_3d<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        geometry::anaglyph_3d(&mut buffer);
        Ok(to_py(py, buffer))
    }

    // ========================================================================
    // Randomized Effects
    // ========================================================================

    /// Pixel sort with a named preset.
    ///
    /// # Returns
    /// `(image, sorts)` where `sorts` is the number of segments sorted.
    #[pyfunction]
    #[pyo3(signature = (image, preset, seed=None))]
    pub fn pixel_sort<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        preset: &str,
        seed: Option<u64>,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, usize)> {
        let preset: PixelSortPreset = parse_name("pixel sort preset", preset)?;
        let mut buffer = to_buffer(image)?;
        let mut rng = make_rng(seed);
        let sorts = match preset.to_options(buffer.width(), &mut rng) {
            Some(options) => pixelsort::pixel_sort(&mut buffer, &options, &mut rng)?,
            None => 0,
        };
        Ok((to_py(py, buffer), sorts))
    }

    #[pyfunction]
    #[pyo3(signature = (image, seed=None))]
    pub fn corrupt<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, seed: Option<u64>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut buffer = to_buffer(image)?;
        corrupt_mod::corrupt(&mut buffer, &mut make_rng(seed))?;
        Ok(to_py(py, buffer))
    }

    /// Run the effect pipeline described by a JSON object.
    ///
    /// Keys are kebab-case (`"hue-shift"`, `"pixel-sort"`, `"3d"`, ...);
    /// missing keys are disabled.
    #[pyfunction]
    #[pyo3(signature = (image, config, seed=None))]
    pub fn apply_effects<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        config: &str,
        seed: Option<u64>,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, usize)> {
        let config: EffectConfig =
            serde_json::from_str(config).map_err(|e| PyValueError::new_err(format!("invalid effect config: {}", e)))?;
        let mut buffer = to_buffer(image)?;
        let report = pipeline::apply_effects(&mut buffer, &config, &mut make_rng(seed))?;
        Ok((to_py(py, buffer), report.sorts))
    }

    // ========================================================================
    // Module Registration
    // ========================================================================

    #[pymodule]
    pub fn pixelglitch(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Color filters
        m.add_function(wrap_pyfunction!(lightness, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(hue_shift, m)?)?;
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(sine_color_shift, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;

        // Convolution & edges
        m.add_function(wrap_pyfunction!(blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(detect_edges, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(mirror, m)?)?;
        m.add_function(wrap_pyfunction!(rgb_shift, m)?)?;
        m.add_function(wrap_pyfunction!(anaglyph_3d, m)?)?;

        // Randomized effects
        m.add_function(wrap_pyfunction!(pixel_sort, m)?)?;
        m.add_function(wrap_pyfunction!(corrupt, m)?)?;
        m.add_function(wrap_pyfunction!(apply_effects, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixelglitch;
