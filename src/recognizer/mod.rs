//! Continuous pitch recognition of streamed audio.
//!
//! A [`PitchRecognizer`] buffers appended samples in a ring buffer and
//! analyzes the newest window on a dedicated thread whenever a full window
//! is available. Requests arriving while an analysis runs are coalesced,
//! so a slow analysis never builds up a backlog: at most one more analysis
//! follows the running one, and it works on the newest samples.

mod observer;
mod schedule;

pub use observer::PitchObserver;
pub use schedule::{Schedule, ScheduleState, Trigger};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, error, trace};

use crate::common::AutocorrelationEngine;
use crate::config::RecognizerConfig;
use crate::error::{PitchError, RecognizerError};
use crate::mpm::PitchEstimator;
use crate::ring_buffer::{sample_ring_buffer, SampleConsumer, SampleProducer};

const WORKER_THREAD_NAME: &str = "pitch-analysis";

/// Estimates the pitch of a live monophonic signal.
///
/// Audio is passed to [`append`](PitchRecognizer::append) from a single
/// thread, typically the capture callback. Every completed analysis
/// delivers exactly one result to the observer, on the analysis thread.
///
/// ```
/// use micro_tuner::{PitchError, PitchRecognizer, RecognizerConfig};
///
/// let config = RecognizerConfig::default();
/// let (tx, rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
/// let mut recognizer = PitchRecognizer::new(config, tx).unwrap();
///
/// let samples: Vec<f32> = (0..config.calculation_input_size())
///     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * (i as f32) / config.sample_rate).sin())
///     .collect();
/// recognizer.append(&samples[..]);
///
/// let pitch = rx.recv().unwrap().unwrap();
/// assert!((pitch - 220.0).abs() <= 1.0);
/// ```
pub struct PitchRecognizer {
    config: RecognizerConfig,
    window_size: usize,
    producer: SampleProducer,
    schedule: Arc<Schedule>,
    wake: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PitchRecognizer {
    /// Creates a recognizer and starts its analysis thread.
    pub fn new<O: PitchObserver>(
        config: RecognizerConfig,
        observer: O,
    ) -> Result<Self, RecognizerError> {
        let estimator = PitchEstimator::from_config(&config)?;
        let window_size = config.calculation_input_size();
        let engine = AutocorrelationEngine::new(window_size)?;
        let (producer, consumer) = sample_ring_buffer(config.buffer_capacity());
        let schedule = Arc::new(Schedule::new());
        let (wake, woken) = crossbeam_channel::bounded(1);

        let worker = AnalysisWorker {
            consumer,
            window: vec![0.0; window_size].into_boxed_slice(),
            engine,
            estimator,
            observer,
            schedule: Arc::clone(&schedule),
        };
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run(woken))
            .map_err(RecognizerError::Spawn)?;

        debug!(
            "Created pitch recognizer: window size {}, buffer capacity {}, {} Hz, minimum frequency {} Hz",
            window_size,
            producer.capacity(),
            config.sample_rate,
            config.minimum_frequency
        );

        Ok(PitchRecognizer {
            config,
            window_size,
            producer,
            schedule,
            wake: Some(wake),
            worker: Some(handle),
        })
    }

    /// Appends mono samples and triggers an analysis if a full window is
    /// buffered. Never blocks. Returns the number of samples buffered, which
    /// is less than `samples.len()` if the buffer is full.
    pub fn append(&mut self, samples: &[f32]) -> usize {
        let written = self.producer.write(samples);
        if written < samples.len() {
            debug!(
                "Sample buffer full, dropped {} of {} samples",
                samples.len() - written,
                samples.len()
            );
        }
        if self.producer.available_to_read() >= self.window_size {
            self.trigger();
        }
        written
    }

    fn trigger(&self) {
        match self.schedule.request() {
            Trigger::Start => {
                if let Some(wake) = &self.wake {
                    match wake.try_send(()) {
                        Ok(()) => {}
                        // The thread already has a wake up waiting
                        Err(TrySendError::Full(())) => {}
                        Err(TrySendError::Disconnected(())) => {
                            error!("Analysis thread is gone, dropping analysis request")
                        }
                    }
                }
            }
            Trigger::Queued => trace!("Analysis queued"),
            Trigger::Coalesced => trace!("Analysis request coalesced"),
        }
    }

    pub fn state(&self) -> ScheduleState {
        self.schedule.state()
    }

    /// The number of samples in an analysis window.
    pub fn calculation_input_size(&self) -> usize {
        self.window_size
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn minimum_frequency(&self) -> f32 {
        self.config.minimum_frequency
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }
}

impl Drop for PitchRecognizer {
    fn drop(&mut self) {
        // Disconnecting the wake channel stops the analysis thread once
        // it has finished any analysis in flight
        self.wake.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Analysis thread panicked");
            }
        }
    }
}

/// Everything the analysis thread owns.
struct AnalysisWorker<O> {
    consumer: SampleConsumer,
    window: Box<[f32]>,
    engine: AutocorrelationEngine,
    estimator: PitchEstimator,
    observer: O,
    schedule: Arc<Schedule>,
}

impl<O: PitchObserver> AnalysisWorker<O> {
    fn run(mut self, woken: Receiver<()>) {
        for () in woken.iter() {
            loop {
                self.analyze();
                if !self.schedule.finish() {
                    break;
                }
            }
        }
        debug!("Analysis thread stopped");
    }

    fn analyze(&mut self) {
        let region = self.consumer.peek_readable();
        let available = region.len();
        if region.copy_latest(&mut self.window[..]) == 0 {
            trace!(
                "Skipping analysis, {} of {} samples available",
                available,
                self.window.len()
            );
            return;
        }
        region.consume_all();

        let result = match self.engine.compute(&self.window[..]) {
            Ok(autocorr) => self.estimator.estimate(autocorr, &self.window[..]),
            Err(error) => {
                debug!("Autocorrelation failed: {}", error);
                Err(PitchError::from(error))
            }
        };
        trace!("Analyzed {} samples: {:?}", available, result);
        self.observer.on_result(result);
    }
}
