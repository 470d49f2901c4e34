//! Live monophonic pitch recognition using the MPM (McLeod Pitch Method) [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29)
//! detection algorithm, described in the paper [A smarter way to find pitch](http://www.cs.otago.ac.nz/tartini/papers/A_Smarter_Way_to_Find_Pitch.pdf)
//! by Philip McLeod and Geoff Wyvill.
//!
//! Features
//! * Lock free single producer, single consumer sample buffering, so audio
//! can be appended from a capture callback without blocking.
//! * FFT accelerated autocorrelation and the incremental NSDF computation
//! suggested in the above paper.
//! * Analysis on a dedicated thread, with overlapping requests coalesced so
//! results always reflect the newest audio.
//! * Mapping of frequencies to equal tempered note names.
//!
//! # Examples
//!
//! ```
//! use micro_tuner::{Note, PitchError, PitchRecognizer, RecognizerConfig};
//!
//! let config = RecognizerConfig::default();
//! let (tx, rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
//! let mut recognizer = PitchRecognizer::new(config, tx).unwrap();
//!
//! // Append a pure tone at 440 Hz in small chunks, like a capture callback would.
//! let samples: Vec<f32> = (0..config.calculation_input_size())
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * (i as f32) / config.sample_rate).sin())
//!     .collect();
//! for chunk in samples.chunks(512) {
//!     recognizer.append(chunk);
//! }
//!
//! match rx.recv().unwrap() {
//!     Ok(pitch) => {
//!         let note = Note::new(pitch).unwrap();
//!         assert_eq!(note.name(), "A");
//!     }
//!     Err(error) => panic!("{}", error),
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod input;
pub mod mpm;
pub mod note;
pub mod recognizer;
pub mod ring_buffer;

pub use config::{PeakRefinement, RecognizerConfig};
pub use error::{CaptureError, ConfigError, PitchError, RecognizerError, TransformError};
pub use input::{listen, AudioInput, AudioTap};
pub use note::{note_for, Note};
pub use recognizer::{PitchObserver, PitchRecognizer, ScheduleState};
