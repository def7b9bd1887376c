//! Musical Scales
//!
//! Named interval sets used to quantize a drone's X position into a pitch.

use std::collections::HashMap;

/// MIDI note number type
pub type MidiNote = u8;

/// Octaves generated above the root
pub const SCALE_OCTAVES: u8 = 3;

/// Scale used when a name is not recognised
pub const FALLBACK_SCALE: &str = "Chromatic";

/// Scale names in menu order
pub const SCALE_NAMES: [&str; 10] = [
    "Chromatic",
    "Major",
    "Minor",
    "Pentatonic",
    "Blues",
    "Dorian",
    "Phrygian",
    "Mixolydian",
    "Lydian",
    "Locrian",
];

lazy_static::lazy_static! {
    /// Process-wide read-only scale table
    pub static ref SCALE_TABLE: ScaleTable = ScaleTable::new();
}

/// Immutable mapping from scale name to semitone offsets within one octave
#[derive(Clone, Debug)]
pub struct ScaleTable {
    scales: HashMap<&'static str, Vec<u8>>,
}

impl ScaleTable {
    pub fn new() -> Self {
        let mut scales = HashMap::new();
        scales.insert("Chromatic", vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        scales.insert("Major", vec![0, 2, 4, 5, 7, 9, 11]);
        scales.insert("Minor", vec![0, 2, 3, 5, 7, 8, 10]);
        scales.insert("Pentatonic", vec![0, 2, 4, 7, 9]);
        scales.insert("Blues", vec![0, 3, 5, 6, 7, 10]);
        scales.insert("Dorian", vec![0, 2, 3, 5, 7, 9, 10]);
        scales.insert("Phrygian", vec![0, 1, 3, 5, 7, 8, 10]);
        scales.insert("Mixolydian", vec![0, 2, 4, 5, 7, 9, 10]);
        scales.insert("Lydian", vec![0, 2, 4, 6, 7, 9, 11]);
        scales.insert("Locrian", vec![0, 1, 3, 5, 6, 8, 10]);
        Self { scales }
    }

    /// Intervals for a scale, matched case-insensitively
    pub fn intervals(&self, name: &str) -> Option<&[u8]> {
        SCALE_NAMES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(name.trim()))
            .and_then(|known| self.scales.get(known))
            .map(Vec::as_slice)
    }

    /// Three octaves of the scale from `root`, ascending, limited to 0-127
    pub fn notes_for(&self, name: &str, root: MidiNote) -> Vec<MidiNote> {
        let intervals = match self.intervals(name) {
            Some(intervals) => intervals,
            None => {
                tracing::debug!("Unknown scale '{}', using {}", name, FALLBACK_SCALE);
                self.scales
                    .get(FALLBACK_SCALE)
                    .map(Vec::as_slice)
                    .unwrap_or(&[0])
            }
        };

        let mut notes = Vec::with_capacity(intervals.len() * SCALE_OCTAVES as usize);
        for octave in 0..SCALE_OCTAVES as u16 {
            for &interval in intervals {
                let note = root as u16 + octave * 12 + interval as u16;
                if note < 128 {
                    notes.push(note as MidiNote);
                }
            }
        }
        notes
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `SCALE_TABLE.notes_for`
pub fn notes_for(name: &str, root: MidiNote) -> Vec<MidiNote> {
    SCALE_TABLE.notes_for(name, root)
}
