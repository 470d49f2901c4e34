//! Recognizer configuration.

use serde::{Deserialize, Serialize};

use crate::common::MAX_FFT_SIZE;
use crate::error::ConfigError;

/// The number of analysis windows the ring buffer can hold.
const WINDOWS_PER_BUFFER: usize = 4;

/// How the lag of the selected NSDF maximum is converted to a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakRefinement {
    /// Use the integer lag of the maximum.
    None,
    /// Fit a parabola through the maximum and its neighbors and use the lag of its apex.
    Parabolic,
}

/// Parameters fixed for the lifetime of a [`PitchRecognizer`](crate::PitchRecognizer).
///
/// Partial JSON or TOML documents deserialize with the remaining fields
/// set to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// The lowest frequency, in Hz, guaranteed to be detectable. Determines
    /// the analysis window size.
    pub minimum_frequency: f32,
    /// The sample rate of the incoming audio in Hz. A mismatch with the
    /// actual capture rate is not detected and scales all estimates.
    pub sample_rate: f32,
    /// An NSDF maximum is a pitch candidate only if it exceeds this fraction
    /// of the NSDF value at lag 0.
    pub peak_threshold: f32,
    /// How the lag of the selected maximum is refined.
    pub peak_refinement: PeakRefinement,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        RecognizerConfig {
            minimum_frequency: 25.0,
            sample_rate: 44100.0,
            peak_threshold: 0.9,
            peak_refinement: PeakRefinement::Parabolic,
        }
    }
}

impl RecognizerConfig {
    pub fn with_minimum_frequency(mut self, minimum_frequency: f32) -> Self {
        self.minimum_frequency = minimum_frequency;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_peak_threshold(mut self, peak_threshold: f32) -> Self {
        self.peak_threshold = peak_threshold;
        self
    }

    pub fn with_peak_refinement(mut self, peak_refinement: PeakRefinement) -> Self {
        self.peak_refinement = peak_refinement;
        self
    }

    /// The number of samples in an analysis window: the smallest power of two
    /// spanning at least two periods of the minimum frequency.
    pub fn calculation_input_size(&self) -> usize {
        let two_periods = 2.0 * f64::from(self.sample_rate) / f64::from(self.minimum_frequency);
        let exponent = two_periods.log2().ceil().max(2.0);
        1_usize
            .checked_shl(exponent as u32)
            .unwrap_or(usize::MAX)
    }

    /// The number of samples the ring buffer holds.
    pub fn buffer_capacity(&self) -> usize {
        WINDOWS_PER_BUFFER.saturating_mul(self.calculation_input_size())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if !(self.minimum_frequency.is_finite() && self.minimum_frequency > 0.0) {
            return Err(ConfigError::InvalidMinimumFrequency(self.minimum_frequency));
        }
        if self.minimum_frequency >= 0.5 * self.sample_rate {
            return Err(ConfigError::MinimumFrequencyTooHigh {
                minimum_frequency: self.minimum_frequency,
                sample_rate: self.sample_rate,
            });
        }
        if !(self.peak_threshold > 0.0 && self.peak_threshold <= 1.0) {
            return Err(ConfigError::InvalidPeakThreshold(self.peak_threshold));
        }
        let window_size = self.calculation_input_size();
        if window_size > MAX_FFT_SIZE / 2 {
            return Err(ConfigError::WindowTooLarge { window_size });
        }
        Ok(())
    }
}
