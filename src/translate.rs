//! Key event to MIDI message translation
//!
//! A stateless per-event transform: each key press or release becomes at
//! most one 3-byte Note On/Off message. No voice table is needed because
//! every key maps to a fixed note.

use evdev::Key;

use crate::keymap::KeyMap;

/// Status byte for Note On, channel 0
pub const NOTE_ON: u8 = 0x90;

/// Status byte for Note Off, channel 0
pub const NOTE_OFF: u8 = 0x80;

/// Velocity sent with every Note On (velocity-sensitive input is out of scope)
pub const PRESS_VELOCITY: u8 = 127;

/// What happened to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Key went down
    Pressed,
    /// Key came up
    Released,
    /// Key-held auto-repeat
    Repeated,
}

impl KeyKind {
    /// Convert a raw evdev key value (0 = up, 1 = down, 2 = auto-repeat).
    /// Any other value is not a key state change and yields None.
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Released),
            1 => Some(Self::Pressed),
            2 => Some(Self::Repeated),
            _ => None,
        }
    }
}

/// A single key event from the input device
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// Key code as reported by the input subsystem
    pub code: Key,
    /// Press, release, or auto-repeat
    pub kind: KeyKind,
}

impl KeyEvent {
    pub fn new(code: Key, kind: KeyKind) -> Self {
        Self { code, kind }
    }
}

/// Translates key events into MIDI Note On/Off messages.
///
/// Holds the immutable key map and configuration for the run; translation
/// itself is a pure function of the event.
#[derive(Debug, Clone)]
pub struct Translator {
    keymap: KeyMap,
    channel: u8,
    transpose: i32,
}

impl Translator {
    /// Create a translator for a zero-based channel (0-15) and a transpose
    /// amount in semitones
    pub fn new(keymap: KeyMap, channel: u8, transpose: i32) -> Self {
        Self {
            keymap,
            channel: channel & 0x0F,
            transpose,
        }
    }

    /// Translate one key event into a MIDI message, if it produces one.
    ///
    /// Presses of mapped keys yield Note On, releases yield Note Off with
    /// the same note and channel. Auto-repeat and unmapped keys yield
    /// nothing.
    pub fn translate(&self, event: KeyEvent) -> Option<[u8; 3]> {
        let base = self.keymap.lookup(event.code)?;
        let note = self.apply_transpose(base);
        match event.kind {
            KeyKind::Pressed => Some([NOTE_ON | self.channel, note, PRESS_VELOCITY]),
            KeyKind::Released => Some([NOTE_OFF | self.channel, note, 0]),
            KeyKind::Repeated => None,
        }
    }

    // Euclidean modulo so a very negative transpose still lands in 0..=126.
    // The historical wraparound is mod 127, not 128; keep it that way.
    fn apply_transpose(&self, base: u8) -> u8 {
        (base as i32 + self.transpose).rem_euclid(127) as u8
    }
}
