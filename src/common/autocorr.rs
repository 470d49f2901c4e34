use super::fft::{is_supported_fft_size, real_fft, MIN_FFT_SIZE};
use crate::error::TransformError;

/// Computes the length of the FFT needed to compute the autocorrelation
/// for a given window size and lag count to avoid circular convolution effects.
///
/// # Arguments
///
/// * `window_size` - The size of the input window.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft_size(window_size: usize, lag_count: usize) -> usize {
    debug_assert!(lag_count <= window_size);
    let min_length = window_size.saturating_add(lag_count).saturating_sub(1);
    min_length
        .max(MIN_FFT_SIZE)
        .checked_next_power_of_two()
        .unwrap_or(usize::MAX)
}

/// Computes the linear [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given window using FFT.
///
/// # Arguments
///
/// * `window` - Input window
/// * `result` - A buffer of length `autocorr_fft_size(window.len(), lag_count)`. On return, the
/// first `lag_count` elements hold the autocorrelation.
/// * `scratch_buffer` - A scratch buffer used for temporary storage, same length as `result`.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft(
    window: &[f32],
    result: &mut [f32],
    scratch_buffer: &mut [f32],
    lag_count: usize,
) -> Result<(), TransformError> {
    let fft_size = autocorr_fft_size(window.len(), lag_count);
    if !is_supported_fft_size(fft_size) {
        return Err(TransformError::UnsupportedSize { size: fft_size });
    }
    if result.len() != fft_size || scratch_buffer.len() != fft_size {
        return Err(TransformError::WindowSizeMismatch {
            expected: fft_size,
            actual: result.len().min(scratch_buffer.len()),
        });
    }

    // Build FFT input signal
    result[..window.len()].copy_from_slice(window);
    for element in result.iter_mut().skip(window.len()) {
        *element = 0.0
    }

    // Perform the FFT in place
    let fft = real_fft(result)?;

    // Compute the power spectral density by point-wise multiplication by the complex conjugate.
    scratch_buffer[0] = fft[0].re * fft[0].re;
    for (index, fft_value) in fft.iter().enumerate().skip(1) {
        let norm_sq = fft_value.norm_sqr();
        scratch_buffer[index] = norm_sq;
        scratch_buffer[fft_size - index] = norm_sq;
    }
    scratch_buffer[fft.len()] = fft[0].im * fft[0].im;

    // The power spectral density is real and symmetric, so a forward FFT
    // equals the inverse FFT up to a scaling factor.
    let ifft = real_fft(scratch_buffer)?;

    let scale = 1.0 / (fft_size as f32);
    for (value, transformed) in result.iter_mut().zip(ifft.iter()).take(lag_count) {
        *value = scale * transformed.re;
    }
    Ok(())
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given window using time domain convolution.
pub fn autocorr_conv(window: &[f32], result: &mut [f32]) {
    let window_size = window.len();
    let lag_count = result.len().min(window_size);

    for tau in 0..lag_count {
        let mut sum: f32 = 0.0;
        for j in 0..window_size - tau {
            sum += window[j] * window[j + tau];
        }
        result[tau] = sum;
    }
}

/// Computes the linear autocorrelation of fixed size windows, reusing
/// the zero padded transform buffers between calls.
pub struct AutocorrelationEngine {
    window_size: usize,
    fft_buffer: Box<[f32]>,
    scratch_buffer: Box<[f32]>,
}

impl AutocorrelationEngine {
    /// Creates an engine for windows of `window_size` samples. The window is
    /// zero padded to (at least) twice its length before the transform.
    pub fn new(window_size: usize) -> Result<Self, TransformError> {
        let fft_size = autocorr_fft_size(window_size, window_size);
        if window_size == 0 || !is_supported_fft_size(fft_size) {
            return Err(TransformError::UnsupportedSize { size: fft_size });
        }
        Ok(AutocorrelationEngine {
            window_size,
            fft_buffer: vec![0.0; fft_size].into_boxed_slice(),
            scratch_buffer: vec![0.0; fft_size].into_boxed_slice(),
        })
    }

    /// The number of samples in a window, which is also the number of lags computed.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// The size of the zero padded transform.
    pub fn fft_size(&self) -> usize {
        self.fft_buffer.len()
    }

    /// Computes the autocorrelation of `window` at lags `0..window_size`.
    pub fn compute(&mut self, window: &[f32]) -> Result<&[f32], TransformError> {
        if window.len() != self.window_size {
            return Err(TransformError::WindowSizeMismatch {
                expected: self.window_size,
                actual: window.len(),
            });
        }
        autocorr_fft(
            window,
            &mut self.fft_buffer[..],
            &mut self.scratch_buffer[..],
            self.window_size,
        )?;
        Ok(&self.fft_buffer[..self.window_size])
    }
}

/// Computes the linear autocorrelation of `window` at lags `0..window.len()`.
/// Returns an empty vector if no transform can be set up for the window size.
pub fn linear_autocorrelation(window: &[f32]) -> Vec<f32> {
    match AutocorrelationEngine::new(window.len()) {
        Ok(mut engine) => match engine.compute(window) {
            Ok(autocorr) => autocorr.to_vec(),
            Err(_) => Vec::new(),
        },
        Err(_) => Vec::new(),
    }
}
