use std::time::Duration;

use crossbeam_channel::Receiver;
use micro_tuner::{
    listen, AudioInput, AudioTap, CaptureError, Note, PitchError, PitchRecognizer,
    RecognizerConfig, ScheduleState,
};

const SAMPLE_RATE: f32 = 44100.0;

fn sine(frequency: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * frequency * (i as f32) / SAMPLE_RATE).sin())
        .collect()
}

fn recognizer_with_channel(
    config: RecognizerConfig,
) -> (PitchRecognizer, Receiver<Result<f32, PitchError>>) {
    let (tx, rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
    let recognizer = PitchRecognizer::new(config, tx).unwrap();
    (recognizer, rx)
}

/// Streams `samples` in capture sized chunks and returns every result
/// delivered until the recognizer is dropped.
fn recognize(samples: &[f32]) -> Vec<Result<f32, PitchError>> {
    let (mut recognizer, rx) = recognizer_with_channel(RecognizerConfig::default());
    for chunk in samples.chunks(512) {
        recognizer.append(chunk);
    }
    // Dropping the recognizer waits for the analysis in flight
    drop(recognizer);
    rx.iter().collect()
}

fn pure_frequency(frequency: f32) {
    let samples = sine(frequency, (0.25 * SAMPLE_RATE) as usize);
    let results = recognize(&samples[..]);
    assert!(!results.is_empty());
    for result in results {
        let pitch = result.unwrap();
        assert!(
            (pitch - frequency).abs() <= 1.0,
            "expected {} Hz, got {} Hz",
            frequency,
            pitch
        );
    }
}

#[test]
fn sine_30_hz() {
    pure_frequency(30.0);
}

#[test]
fn sine_110_hz() {
    pure_frequency(110.0);
}

#[test]
fn sine_220_hz() {
    pure_frequency(220.0);
}

#[test]
fn sine_440_hz() {
    pure_frequency(440.0);
}

#[test]
fn sine_880_hz() {
    pure_frequency(880.0);
}

#[test]
fn silence() {
    let results = recognize(&vec![0.0; 4186][..]);
    assert!(!results.is_empty());
    for result in results {
        assert_eq!(result, Err(PitchError::CouldNotDetectPitch));
    }
}

#[test]
fn below_minimum_frequency() {
    // One 20 Hz period and the negative half period after it fit in the
    // window, so the period is found but not trusted
    let window_size = RecognizerConfig::default().calculation_input_size();
    let results = recognize(&sine(20.0, window_size)[..]);
    assert_eq!(results, vec![Err(PitchError::PitchBelowNyquist)]);
}

#[test]
fn detected_note() {
    let window_size = RecognizerConfig::default().calculation_input_size();
    let results = recognize(&sine(261.63, window_size)[..]);
    let note = Note::new(results[0].unwrap()).unwrap();
    assert_eq!(note.name(), "C");
    assert!(note.cents().abs() <= 10.0);
}

#[test]
fn requests_during_analysis_are_coalesced() {
    let config = RecognizerConfig::default();
    let window_size = config.calculation_input_size();

    // The observer reports each result and then blocks until released
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
    let mut recognizer = PitchRecognizer::new(config, move |result: Result<f32, PitchError>| {
        result_tx.send(result).unwrap();
        let _ = gate_rx.recv();
    })
    .unwrap();

    recognizer.append(&sine(110.0, window_size)[..]);
    let first = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!((first.unwrap() - 110.0).abs() <= 1.0);
    assert_eq!(recognizer.state(), ScheduleState::Analyzing);

    // Three more windows arrive while the first result is being delivered
    for frequency in [220.0, 330.0, 440.0].iter() {
        assert_eq!(recognizer.append(&sine(*frequency, window_size)[..]), window_size);
    }
    assert_eq!(recognizer.state(), ScheduleState::AnalyzingWithPending);

    gate_tx.send(()).unwrap();
    // Exactly one more analysis runs, on the newest window
    let second = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!((second.unwrap() - 440.0).abs() <= 1.0);

    drop(gate_tx);
    assert!(result_rx
        .recv_timeout(Duration::from_millis(300))
        .is_err());
    assert_eq!(recognizer.state(), ScheduleState::Idle);
}

#[test]
fn buffer_overflow_keeps_the_oldest_samples() {
    let config = RecognizerConfig::default();
    let window_size = config.calculation_input_size();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
    let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
    let mut recognizer = PitchRecognizer::new(config, move |result: Result<f32, PitchError>| {
        result_tx.send(result).unwrap();
        let _ = gate_rx.recv();
    })
    .unwrap();

    recognizer.append(&sine(110.0, window_size)[..]);
    result_rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();

    // Fill the buffer with 220 Hz, then try to overwrite it with 440 Hz
    let capacity = config.buffer_capacity();
    assert_eq!(recognizer.append(&sine(220.0, capacity)[..]), capacity);
    assert_eq!(recognizer.append(&sine(440.0, window_size)[..]), 0);

    drop(gate_tx);
    let pitch = result_rx
        .recv_timeout(Duration::from_secs(5))
        .unwrap()
        .unwrap();
    assert!((pitch - 220.0).abs() <= 1.0);
}

fn wait_until_idle(recognizer: &PitchRecognizer) {
    for _ in 0..500 {
        if recognizer.state() == ScheduleState::Idle {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("analysis did not finish");
}

#[test]
fn full_bounded_channel_holds_back_the_next_result() {
    let config = RecognizerConfig::default();
    let window_size = config.calculation_input_size();
    let (tx, rx) = crossbeam_channel::bounded::<Result<f32, PitchError>>(1);
    let mut recognizer = PitchRecognizer::new(config, tx).unwrap();

    // The first result fills the channel
    recognizer.append(&sine(110.0, window_size)[..]);
    wait_until_idle(&recognizer);

    // The second analysis waits for room instead of dropping its result
    recognizer.append(&sine(220.0, window_size)[..]);
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(recognizer.state(), ScheduleState::Analyzing);

    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert!((first - 110.0).abs() <= 1.0);
    let second = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert!((second - 220.0).abs() <= 1.0);

    drop(recognizer);
    assert!(rx.recv().is_err());
}

struct MockMicrophone {
    sample_rate: f32,
    running: bool,
    tap: Option<AudioTap>,
}

impl MockMicrophone {
    /// Delivers `samples` to the installed tap like a capture callback would.
    fn capture(&mut self, samples: &[f32], buffer_size: usize) {
        if !self.running {
            return;
        }
        if let Some(tap) = self.tap.as_mut() {
            for buffer in samples.chunks(buffer_size) {
                tap(buffer);
            }
        }
    }
}

impl AudioInput for MockMicrophone {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn install_tap(&mut self, _buffer_size: usize, tap: AudioTap) {
        self.tap = Some(tap);
    }
}

#[test]
fn listen_to_microphone() {
    let config = RecognizerConfig::default();
    let (recognizer, rx) = recognizer_with_channel(config);
    let mut microphone = MockMicrophone {
        sample_rate: SAMPLE_RATE,
        running: false,
        tap: None,
    };
    listen(&mut microphone, recognizer, 1024).unwrap();

    microphone.capture(&sine(220.0, config.calculation_input_size())[..], 1024);
    let pitch = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
    assert!((pitch - 220.0).abs() <= 1.0);

    // Nothing reaches the recognizer once stopped
    microphone.stop();
    microphone.capture(&sine(220.0, config.calculation_input_size())[..], 1024);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    // Dropping the tap drops the recognizer and disconnects the results
    microphone.tap = None;
    assert!(rx.recv().is_err());
}
