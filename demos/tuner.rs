//! Runs the recognizer on a synthetic input playing a sequence of slightly
//! detuned notes in real time and prints what it hears.
//!
//! Run with `RUST_LOG=debug` to see the recognizer's log output.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use micro_tuner::common::midi_note_to_freq;
use micro_tuner::{
    listen, AudioInput, AudioTap, CaptureError, Note, PitchError, PitchRecognizer,
    RecognizerConfig,
};

/// An audio input that plays each note for `note_duration`, then goes silent.
struct SyntheticInput {
    sample_rate: f32,
    notes: Vec<f32>,
    note_duration: Duration,
    buffer_size: usize,
    tap: Option<AudioTap>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SyntheticInput {
    fn new(sample_rate: f32, notes: Vec<f32>, note_duration: Duration) -> Self {
        SyntheticInput {
            sample_rate,
            notes,
            note_duration,
            buffer_size: 512,
            tap: None,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl AudioInput for SyntheticInput {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        let mut tap = self.tap.take().ok_or(CaptureError::Unavailable)?;
        let sample_rate = self.sample_rate;
        let notes = self.notes.clone();
        let buffer_size = self.buffer_size;
        let buffers_per_note =
            (self.note_duration.as_secs_f32() * sample_rate) as usize / buffer_size;
        let buffer_duration = Duration::from_secs_f32(buffer_size as f32 / sample_rate);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Release);

        let thread = thread::Builder::new()
            .name("synthetic-input".to_string())
            .spawn(move || {
                let mut buffer = vec![0.0; buffer_size];
                let mut phase: f32 = 0.0;
                for frequency in notes {
                    for _ in 0..buffers_per_note {
                        if !running.load(Ordering::Acquire) {
                            return;
                        }
                        for sample in buffer.iter_mut() {
                            *sample = 0.8 * phase.sin();
                            phase += 2.0 * std::f32::consts::PI * frequency / sample_rate;
                            if phase > 2.0 * std::f32::consts::PI {
                                phase -= 2.0 * std::f32::consts::PI;
                            }
                        }
                        tap(&buffer[..]);
                        thread::sleep(buffer_duration);
                    }
                }
                // Silence after the last note
                for sample in buffer.iter_mut() {
                    *sample = 0.0;
                }
                for _ in 0..buffers_per_note {
                    tap(&buffer[..]);
                    thread::sleep(buffer_duration);
                }
            })
            .map_err(|error| CaptureError::Start(error.to_string()))?;
        self.thread = Some(thread);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.join();
    }

    fn install_tap(&mut self, buffer_size: usize, tap: AudioTap) {
        self.buffer_size = buffer_size;
        self.tap = Some(tap);
    }
}

fn describe(result: Result<f32, PitchError>) -> String {
    match result {
        Ok(pitch) => match Note::new(pitch) {
            Some(note) => format!(
                "{:<2} {:+6.1} cents | {:8.2} Hz",
                note.name(),
                note.cents(),
                pitch
            ),
            None => format!("{:.2} Hz", pitch),
        },
        Err(error) => format!("-- ({})", error),
    }
}

fn main() {
    env_logger::init();

    let config = RecognizerConfig::default();
    let (tx, rx) = crossbeam_channel::unbounded::<Result<f32, PitchError>>();
    let recognizer = match PitchRecognizer::new(config, tx) {
        Ok(recognizer) => recognizer,
        Err(error) => {
            eprintln!("Failed to create recognizer: {}", error);
            return;
        }
    };

    // E2 A2 D3 G3 B3 E4, each a little out of tune
    let notes: Vec<f32> = [40.1, 44.9, 50.2, 54.8, 59.05, 63.9]
        .iter()
        .map(|midi_note| midi_note_to_freq(*midi_note))
        .collect();
    let mut input = SyntheticInput::new(config.sample_rate, notes, Duration::from_millis(600));
    if let Err(error) = listen(&mut input, recognizer, 512) {
        eprintln!("Unable to access audio input: {}", error);
        return;
    }
    println!("Listening to a synthetic guitar tuning sequence");

    // The results channel disconnects when the input thread, which owns
    // the recognizer through its tap, finishes.
    for result in rx.iter() {
        println!("{}", describe(result));
    }
    input.stop();
}
