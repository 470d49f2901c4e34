//! Common algorithms and utilities.

mod autocorr;
mod fft;
mod midi;

pub use autocorr::{
    autocorr_conv, autocorr_fft, autocorr_fft_size, linear_autocorrelation, AutocorrelationEngine,
};
pub use fft::{is_supported_fft_size, real_fft, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use midi::{freq_to_midi_note, midi_note_to_freq, A4_FREQUENCY, A4_MIDI_NOTE};
