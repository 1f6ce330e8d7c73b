//! midikey - play MIDI from a raw keyboard device
//!
//! Bridges a Linux evdev keyboard to a MIDI output port, translating key
//! press and release events into Note On/Off messages in real time.
//! Features include:
//!
//! - 29-key piano layout across the QWERTY rows (two octaves and change)
//! - Virtual MIDI output port, or connection to an existing port by name
//!   prefix
//! - Channel and transpose configuration
//! - Optional exclusive grab of the input device
//! - Configurable via TOML file
//!
//! # Usage as a Library
//!
//! ```no_run
//! use midikey::{KeyMap, Translator, KeyEvent, KeyKind};
//!
//! let translator = Translator::new(KeyMap::standard(), 0, 0);
//!
//! // A press of Z is Note On for middle C
//! let event = KeyEvent::new(evdev::Key::KEY_Z, KeyKind::Pressed);
//! assert_eq!(translator.translate(event), Some([0x90, 60, 127]));
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod keymap;
pub mod midi;
pub mod translate;

// Re-export main types
pub use config::{Config, DEFAULT_PORT_NAME};
pub use error::{Error, Result};
pub use keymap::KeyMap;
pub use midi::{open_output, CaptureSink, MidiSink, PortSelection};
pub use translate::{KeyEvent, KeyKind, Translator, NOTE_OFF, NOTE_ON, PRESS_VELOCITY};
