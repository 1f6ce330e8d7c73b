//! Error types for midikey

use thiserror::Error;

/// Result type alias for midikey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in midikey
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (invalid channel, transpose, or config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// No MIDI output port matched the requested connect prefix
    #[error("No MIDI output ports found matching \"{prefix}\"")]
    NoPortMatch { prefix: String },

    /// MIDI subsystem initialization error
    #[error("MIDI init error: {0}")]
    MidiInit(#[from] midir::InitError),

    /// MIDI port connection error
    #[error("MIDI connection error: {0}")]
    MidiConnect(String),

    /// MIDI send error
    #[error("MIDI send error: {0}")]
    MidiSend(#[from] midir::SendError),

    /// Input device error (open, grab, or read failure)
    #[error("Input device error: {0}")]
    Device(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
