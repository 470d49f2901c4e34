//! Mapping of frequencies to equal tempered note names, with A4 = 440 Hz.

use crate::common::freq_to_midi_note;

/// Note names indexed by rounded scale degree. A degree that rounds up to
/// the next octave maps to C again.
const NOTE_NAMES: [&str; 13] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B", "C",
];

/// The note closest to a pitch, and how far the pitch is from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pitch: f32,
    midi_value: f32,
    scale_degree: f32,
    name: &'static str,
}

impl Note {
    /// Returns `None` unless `pitch` is a positive, finite frequency in Hz.
    pub fn new(pitch: f32) -> Option<Note> {
        if !(pitch.is_finite() && pitch > 0.0) {
            return None;
        }
        let midi_value = freq_to_midi_note(pitch);
        let scale_degree = midi_value.rem_euclid(12.0);
        let name = NOTE_NAMES
            .get(scale_degree.round() as usize)
            .copied()
            .unwrap_or(NOTE_NAMES[0]);
        Some(Note {
            pitch,
            midi_value,
            scale_degree,
            name,
        })
    }

    /// The frequency in Hz this note was created from.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// The fractional MIDI note number of the pitch.
    pub fn midi_value(&self) -> f32 {
        self.midi_value
    }

    /// The position of the pitch within its octave, in semitones above C, in [0, 12).
    pub fn scale_degree(&self) -> f32 {
        self.scale_degree
    }

    /// The name of the closest note, e.g `"C#"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The letter of the closest note.
    pub fn letter(&self) -> &'static str {
        &self.name[..1]
    }

    /// The accidental of the closest note, if any.
    pub fn accidental(&self) -> Option<&'static str> {
        match &self.name[1..] {
            "" => None,
            accidental => Some(accidental),
        }
    }

    /// The deviation from the closest note mapped to [0, 1], where 0.5 is in tune,
    /// 0 is a quarter tone flat and 1 a quarter tone sharp.
    pub fn gauge_value(&self) -> f32 {
        self.scale_degree - self.scale_degree.round() + 0.5
    }

    /// The deviation from the closest note in cents.
    pub fn cents(&self) -> f32 {
        100.0 * (self.midi_value - self.midi_value.round())
    }
}

/// The note closest to `pitch`, see [`Note::new`].
pub fn note_for(pitch: f32) -> Option<Note> {
    Note::new(pitch)
}
