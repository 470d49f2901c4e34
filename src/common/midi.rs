/// The MIDI note number of the reference pitch A4.
pub const A4_MIDI_NOTE: f32 = 69.0;
/// The frequency in Hz of the reference pitch A4.
pub const A4_FREQUENCY: f32 = 440.0;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    A4_MIDI_NOTE + 12.0 * (freq / A4_FREQUENCY).log2()
}

/// Converts a (fractional) MIDI note number to a frequency in Hz.
pub fn midi_note_to_freq(note_number: f32) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((note_number - A4_MIDI_NOTE) / 12.0)
}
