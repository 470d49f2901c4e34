//! A rust implementation of the MPM [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) detection algorithm,
//! described in the paper [A smarter way to find pitch](http://www.cs.otago.ac.nz/tartini/papers/A_Smarter_Way_to_Find_Pitch.pdf)
//! by Philip McLeod and Geoff Wyvill. The algorithm is used for detecting pitch in monophonic, primarily musical, sounds. It
//! cannot be used to detect multiple pitches at once, like in a musical chord.
//!
//! Starting from the autocorrelation of a window, the normalized square
//! difference function (NSDF) is computed using the incremental scheme
//! described in the paper. The first key maximum of the NSDF exceeding a
//! fraction of the NSDF at lag 0 is taken as the pitch period.
//!
//! # Example
//! ```
//! use micro_tuner::common::linear_autocorrelation;
//! use micro_tuner::mpm::PitchEstimator;
//!
//! // A window containing a pure tone at 440 Hz.
//! let sample_rate = 44100.0;
//! let sine_frequency = 440.0;
//! let window: Vec<f32> = (0..2048)
//!     .map(|i| (2.0 * std::f32::consts::PI * sine_frequency * (i as f32) / sample_rate).sin())
//!     .collect();
//!
//! let autocorr = linear_autocorrelation(&window[..]);
//! let mut estimator = PitchEstimator::new(sample_rate, 50.0, window.len());
//! let pitch = estimator.estimate(&autocorr[..], &window[..]).unwrap();
//! assert!((sine_frequency - pitch).abs() <= 1.0);
//! ```

mod estimator;
mod key_maximum;
mod nsdf;
mod peak_picking;

pub use estimator::PitchEstimator;
pub use key_maximum::KeyMaximum;
pub use nsdf::{m_prime_incremental, square_difference};
pub use peak_picking::{collect_key_maxima, select_key_maximum};
