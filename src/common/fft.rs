use core::convert::TryInto;

use microfft::Complex32;

use crate::error::TransformError;

/// The smallest FFT size supported by [`real_fft`].
pub const MIN_FFT_SIZE: usize = 8;
/// The largest FFT size supported by [`real_fft`].
pub const MAX_FFT_SIZE: usize = 32768;

/// Returns true if `size` can be passed to [`real_fft`].
pub fn is_supported_fft_size(size: usize) -> bool {
    size.is_power_of_two() && size >= MIN_FFT_SIZE && size <= MAX_FFT_SIZE
}

macro_rules! rfft {
    ($buffer:expr, $size:expr, $transform:path) => {{
        let spectrum: &mut [Complex32] = $transform(
            $buffer
                .try_into()
                .map_err(|_| TransformError::UnsupportedSize { size: $size })?,
        );
        spectrum
    }};
}

/// Performs an in-place real FFT on a given buffer. The returned spectrum
/// has half the length of the buffer, with the DC component in `[0].re` and
/// the Nyquist component packed into `[0].im`.
pub fn real_fft(buffer: &mut [f32]) -> Result<&mut [Complex32], TransformError> {
    let size = buffer.len();
    let spectrum = match size {
        8 => rfft!(buffer, size, microfft::real::rfft_8),
        16 => rfft!(buffer, size, microfft::real::rfft_16),
        32 => rfft!(buffer, size, microfft::real::rfft_32),
        64 => rfft!(buffer, size, microfft::real::rfft_64),
        128 => rfft!(buffer, size, microfft::real::rfft_128),
        256 => rfft!(buffer, size, microfft::real::rfft_256),
        512 => rfft!(buffer, size, microfft::real::rfft_512),
        1024 => rfft!(buffer, size, microfft::real::rfft_1024),
        2048 => rfft!(buffer, size, microfft::real::rfft_2048),
        4096 => rfft!(buffer, size, microfft::real::rfft_4096),
        8192 => rfft!(buffer, size, microfft::real::rfft_8192),
        16384 => rfft!(buffer, size, microfft::real::rfft_16384),
        32768 => rfft!(buffer, size, microfft::real::rfft_32768),
        _ => return Err(TransformError::UnsupportedSize { size }),
    };
    Ok(spectrum)
}
