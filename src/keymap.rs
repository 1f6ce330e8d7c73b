//! Key-code to MIDI note mapping
//!
//! Lays the QWERTY rows out as two piano octaves: bottom row plus home row
//! for the lower octave, QWERTY row plus number row for the upper.

use std::collections::HashMap;

use evdev::Key;

/// Immutable mapping from evdev key codes to base MIDI note numbers.
///
/// Built once at startup and shared read-only; unmapped keys are not an
/// error, they simply produce no note.
#[derive(Debug, Clone)]
pub struct KeyMap {
    notes: HashMap<Key, u8>,
}

impl KeyMap {
    /// The standard two-octave layout
    ///
    /// ```text
    ///  Upper octave (number + QWERTY rows):
    ///     2   3       5   6   7       9   0      (black keys)
    ///     C#5 D#5     F#5 G#5 A#5     C#6 D#6
    ///    Q   W   E   R   T   Y   U   I   O   P   (white keys)
    ///    C5  D5  E5  F5  G5  A5  B5  C6  D6  E6
    ///
    ///  Lower octave (home + bottom rows):
    ///     S   D       G   H   J                  (black keys)
    ///     C#4 D#4     F#4 G#4 A#4
    ///    Z   X   C   V   B   N   M               (white keys)
    ///    C4  D4  E4  F4  G4  A4  B4
    /// ```
    pub fn standard() -> Self {
        let notes = HashMap::from([
            // Upper octave, first five keys
            (Key::KEY_Q, 72),
            (Key::KEY_2, 73),
            (Key::KEY_W, 74),
            (Key::KEY_3, 75),
            (Key::KEY_E, 76),
            // Upper octave, F5 through B5
            (Key::KEY_R, 77),
            (Key::KEY_5, 78),
            (Key::KEY_T, 79),
            (Key::KEY_6, 80),
            (Key::KEY_Y, 81),
            (Key::KEY_7, 82),
            (Key::KEY_U, 83),
            // Overflow into the next octave (C6..E6)
            (Key::KEY_I, 84),
            (Key::KEY_9, 85),
            (Key::KEY_O, 86),
            (Key::KEY_0, 87),
            (Key::KEY_P, 88),
            // Lower octave, C4 through E4
            (Key::KEY_Z, 60),
            (Key::KEY_S, 61),
            (Key::KEY_X, 62),
            (Key::KEY_D, 63),
            (Key::KEY_C, 64),
            // Lower octave, F4 through B4
            (Key::KEY_V, 65),
            (Key::KEY_G, 66),
            (Key::KEY_B, 67),
            (Key::KEY_H, 68),
            (Key::KEY_N, 69),
            (Key::KEY_J, 70),
            (Key::KEY_M, 71),
        ]);
        Self { notes }
    }

    /// Get the base MIDI note for a key code, or None if the key is unmapped
    pub fn lookup(&self, code: Key) -> Option<u8> {
        self.notes.get(&code).copied()
    }

    /// Number of mapped keys
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::standard()
    }
}
