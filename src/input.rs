//! The interface to an audio capture device.

use log::{debug, warn};

use crate::error::CaptureError;
use crate::recognizer::PitchRecognizer;

/// A callback receiving each captured buffer of mono samples.
pub type AudioTap = Box<dyn FnMut(&[f32]) + Send + 'static>;

/// A source of mono audio, e.g a microphone.
pub trait AudioInput {
    /// The sample rate of the captured audio in Hz.
    fn sample_rate(&self) -> f32;

    fn start(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self);

    /// Installs `tap` to receive captured audio in buffers of (about)
    /// `buffer_size` samples, replacing any previously installed tap.
    fn install_tap(&mut self, buffer_size: usize, tap: AudioTap);
}

/// Feeds everything `input` captures to `recognizer` and starts the input.
///
/// The recognizer moves into the tap and lives as long as the input keeps
/// it installed. A sample rate differing from the one the recognizer was
/// configured with is not corrected and skews every estimate by the ratio
/// of the two rates.
pub fn listen<I: AudioInput + ?Sized>(
    input: &mut I,
    mut recognizer: PitchRecognizer,
    buffer_size: usize,
) -> Result<(), CaptureError> {
    let input_rate = input.sample_rate();
    if (input_rate - recognizer.sample_rate()).abs() > f32::EPSILON * input_rate.abs() {
        warn!(
            "Input sample rate {} Hz differs from the recognizer sample rate {} Hz",
            input_rate,
            recognizer.sample_rate()
        );
    }

    input.install_tap(
        buffer_size,
        Box::new(move |samples: &[f32]| {
            recognizer.append(samples);
        }),
    );
    input.start()?;
    debug!("Listening in buffers of {} samples", buffer_size);
    Ok(())
}
