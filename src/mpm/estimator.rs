use log::trace;

use super::key_maximum::KeyMaximum;
use super::nsdf::square_difference;
use super::peak_picking::{collect_key_maxima, select_key_maximum};
use crate::config::{PeakRefinement, RecognizerConfig};
use crate::error::{ConfigError, PitchError};

/// Turns the autocorrelation of an analysis window into a pitch estimate.
///
/// The NSDF and key maxima buffers are allocated once and reused, so
/// estimating the pitch of windows of a fixed size allocates nothing.
pub struct PitchEstimator {
    sample_rate: f32,
    minimum_frequency: f32,
    peak_threshold: f32,
    peak_refinement: PeakRefinement,
    nsdf: Vec<f32>,
    key_maxima: Vec<KeyMaximum>,
}

impl PitchEstimator {
    /// Creates an estimator for windows of `lag_count` samples with the
    /// default threshold and peak refinement.
    pub fn new(sample_rate: f32, minimum_frequency: f32, lag_count: usize) -> Self {
        let defaults = RecognizerConfig::default();
        PitchEstimator {
            sample_rate,
            minimum_frequency,
            peak_threshold: defaults.peak_threshold,
            peak_refinement: defaults.peak_refinement,
            nsdf: Vec::with_capacity(lag_count),
            // A sine yields at most one key maximum per period
            key_maxima: Vec::with_capacity(lag_count / 2 + 1),
        }
    }

    /// Creates an estimator for the windows `config` describes. The config
    /// is validated first, since the window size derives from it.
    pub fn from_config(config: &RecognizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut estimator = PitchEstimator::new(
            config.sample_rate,
            config.minimum_frequency,
            config.calculation_input_size(),
        );
        estimator.peak_threshold = config.peak_threshold;
        estimator.peak_refinement = config.peak_refinement;
        Ok(estimator)
    }

    pub fn with_peak_threshold(mut self, peak_threshold: f32) -> Self {
        self.peak_threshold = peak_threshold;
        self
    }

    pub fn with_peak_refinement(mut self, peak_refinement: PeakRefinement) -> Self {
        self.peak_refinement = peak_refinement;
        self
    }

    /// Computes the NSDF of `window` from its autocorrelation.
    pub fn square_difference(
        &mut self,
        autocorr: &[f32],
        window: &[f32],
    ) -> Result<&[f32], PitchError> {
        self.nsdf.clear();
        self.nsdf.resize(autocorr.len(), 0.0);
        square_difference(autocorr, window, &mut self.nsdf[..])?;
        Ok(&self.nsdf[..])
    }

    /// Picks the pitch, in Hz, from the key maxima of `nsdf`.
    pub fn pick_pitch(&mut self, nsdf: &[f32]) -> Result<f32, PitchError> {
        pick_pitch(
            nsdf,
            &mut self.key_maxima,
            self.sample_rate,
            self.minimum_frequency,
            self.peak_threshold,
            self.peak_refinement,
        )
    }

    /// Estimates the pitch, in Hz, of `window` given its autocorrelation.
    pub fn estimate(&mut self, autocorr: &[f32], window: &[f32]) -> Result<f32, PitchError> {
        self.key_maxima.clear();
        self.square_difference(autocorr, window)?;
        pick_pitch(
            &self.nsdf[..],
            &mut self.key_maxima,
            self.sample_rate,
            self.minimum_frequency,
            self.peak_threshold,
            self.peak_refinement,
        )
    }

    /// The NSDF computed by the last call to `estimate` or `square_difference`.
    pub fn nsdf(&self) -> &[f32] {
        &self.nsdf[..]
    }

    /// The key maxima found by the last call to `estimate` or `pick_pitch`.
    pub fn key_maxima(&self) -> &[KeyMaximum] {
        &self.key_maxima[..]
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn minimum_frequency(&self) -> f32 {
        self.minimum_frequency
    }
}

fn pick_pitch(
    nsdf: &[f32],
    key_maxima: &mut Vec<KeyMaximum>,
    sample_rate: f32,
    minimum_frequency: f32,
    peak_threshold: f32,
    peak_refinement: PeakRefinement,
) -> Result<f32, PitchError> {
    if nsdf.len() < 3 {
        key_maxima.clear();
        return Err(PitchError::CouldNotDetectPitch);
    }

    collect_key_maxima(nsdf, key_maxima);
    let threshold = nsdf[0] * peak_threshold;
    let selected = select_key_maximum(&key_maxima[..], threshold)
        .ok_or(PitchError::CouldNotDetectPitch)?;

    let lag = match peak_refinement {
        PeakRefinement::None => selected.lag_index as f32,
        PeakRefinement::Parabolic => selected.lag,
    };
    let pitch = sample_rate / lag;
    trace!(
        "Selected lag {} of {} key maxima, {} Hz",
        lag,
        key_maxima.len(),
        pitch
    );

    if pitch < minimum_frequency {
        return Err(PitchError::PitchBelowNyquist);
    }
    Ok(pitch)
}
