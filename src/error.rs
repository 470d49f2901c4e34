//! Error types.

use thiserror::Error;

/// The two normal negative outcomes of an analysis cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchError {
    /// No NSDF peak exceeded the threshold, or the window was silent.
    #[error("could not detect a pitch")]
    CouldNotDetectPitch,
    /// A peak was found, but its frequency is below the minimum frequency,
    /// meaning the window does not span two of its periods.
    #[error("detected pitch is below the minimum detectable frequency")]
    PitchBelowNyquist,
}

/// FFT setup failures. An analysis cycle hitting one of these reports
/// [`PitchError::CouldNotDetectPitch`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("unsupported FFT size {size}")]
    UnsupportedSize { size: usize },
    #[error("expected a window of {expected} samples, got {actual}")]
    WindowSizeMismatch { expected: usize, actual: usize },
}

impl From<TransformError> for PitchError {
    fn from(_: TransformError) -> Self {
        PitchError::CouldNotDetectPitch
    }
}

/// Invalid [`RecognizerConfig`](crate::RecognizerConfig) values.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),
    #[error("minimum frequency must be positive and finite, got {0}")]
    InvalidMinimumFrequency(f32),
    #[error("minimum frequency {minimum_frequency} Hz is too high for a sample rate of {sample_rate} Hz")]
    MinimumFrequencyTooHigh {
        minimum_frequency: f32,
        sample_rate: f32,
    },
    #[error("peak threshold must be in (0, 1], got {0}")]
    InvalidPeakThreshold(f32),
    #[error("analysis window of {window_size} samples is too large")]
    WindowTooLarge { window_size: usize },
}

/// Errors returned when creating a [`PitchRecognizer`](crate::PitchRecognizer).
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to set up autocorrelation: {0}")]
    Transform(#[from] TransformError),
    #[error("failed to spawn analysis thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors reported by an [`AudioInput`](crate::input::AudioInput).
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no audio input available")]
    Unavailable,
    #[error("failed to start audio input: {0}")]
    Start(String),
}
