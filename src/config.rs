//! Configuration file support for midikey
//!
//! Configuration is stored in TOML format at
//! `~/.config/midikey/config.toml` (Linux). Command-line flags override
//! anything read from the file.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::midi::PortSelection;

/// Default name for the created virtual output port
pub const DEFAULT_PORT_NAME: &str = "midikey";

/// Transpose amounts must lie strictly inside (-127, 127)
pub const TRANSPOSE_LIMIT: i32 = 127;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MIDI output configuration
    pub midi: MidiSettings,
    /// Key handling configuration
    pub keys: KeySettings,
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Err(Error::Config(format!("Config file not found at {:?}", path)))
        }
    }

    /// Load configuration or return default if not found
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "midikey") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            Err(Error::Config("Could not determine config directory".to_string()))
        }
    }

    /// Create a default config file with comments
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = r#"# midikey configuration file

[midi]
# Name of the virtual MIDI output port to create
port_name = "midikey"

# Connect to the first existing MIDI output port whose name starts with
# this prefix, instead of creating a virtual port (optional)
# connect = "UM-ONE"

[keys]
# MIDI channel, zero-based (0-15; the -c flag takes 1-16)
channel = 0

# Transpose every note by this many semitones (-126 to 126)
transpose = 0

# Grab the input device so its key events are not delivered elsewhere
grab = false
"#;

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Check that channel and transpose are within their allowed ranges.
    /// Values arriving through the CLI parsers are already valid; this
    /// catches out-of-range values from the config file.
    pub fn validate(&self) -> Result<()> {
        if self.keys.channel > 15 {
            return Err(Error::Config(format!(
                "Invalid channel number {} (expected 0-15)",
                self.keys.channel
            )));
        }
        if self.keys.transpose <= -TRANSPOSE_LIMIT || self.keys.transpose >= TRANSPOSE_LIMIT {
            return Err(Error::Config(format!(
                "Invalid transpose amount {} (expected -126 to 126)",
                self.keys.transpose
            )));
        }
        Ok(())
    }

    /// The output destination this configuration describes
    pub fn port_selection(&self) -> PortSelection {
        match &self.midi.connect {
            Some(prefix) => PortSelection::ConnectPrefix(prefix.clone()),
            None => PortSelection::Virtual(self.midi.port_name.clone()),
        }
    }
}

/// MIDI output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiSettings {
    /// Name of the virtual output port to create
    pub port_name: String,
    /// Connect to the first existing port starting with this prefix
    /// instead of creating a virtual port
    pub connect: Option<String>,
}

impl Default for MidiSettings {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT_NAME.to_string(),
            connect: None,
        }
    }
}

/// Key handling settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    /// MIDI channel, zero-based (0-15)
    pub channel: u8,
    /// Transpose amount in semitones (-126 to 126)
    pub transpose: i32,
    /// Grab the input device, swallowing its events
    pub grab: bool,
}

/// Parse an external channel number (1-16) into the internal zero-based
/// form (0-15). Used as a clap value parser.
pub fn parse_channel(s: &str) -> std::result::Result<u8, String> {
    let val: i32 = s
        .parse()
        .map_err(|_| format!("Invalid channel number \"{}\"", s))?;
    if !(1..=16).contains(&val) {
        return Err(format!("Invalid channel number \"{}\"", s));
    }
    Ok((val - 1) as u8)
}

/// Parse a transpose amount, rejecting anything outside (-127, 127).
/// Used as a clap value parser.
pub fn parse_transpose(s: &str) -> std::result::Result<i32, String> {
    let val: i32 = s
        .parse()
        .map_err(|_| format!("Invalid transpose amount \"{}\"", s))?;
    if val <= -TRANSPOSE_LIMIT || val >= TRANSPOSE_LIMIT {
        return Err(format!("Invalid transpose amount \"{}\"", s));
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.midi.port_name, "midikey");
        assert_eq!(config.midi.connect, None);
        assert_eq!(config.keys.channel, 0);
        assert_eq!(config.keys.transpose, 0);
        assert!(!config.keys.grab);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel("1"), Ok(0));
        assert_eq!(parse_channel("16"), Ok(15));
        assert!(parse_channel("0").is_err());
        assert!(parse_channel("17").is_err());
        assert!(parse_channel("abc").is_err());
    }

    #[test]
    fn test_parse_transpose() {
        assert_eq!(parse_transpose("0"), Ok(0));
        assert_eq!(parse_transpose("126"), Ok(126));
        assert_eq!(parse_transpose("-126"), Ok(-126));
        // Boundaries are exclusive
        assert!(parse_transpose("127").is_err());
        assert!(parse_transpose("-127").is_err());
        assert!(parse_transpose("twelve").is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = Config::default();
        config.keys.channel = 16;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.keys.transpose = 127;
        assert!(config.validate().is_err());
        config.keys.transpose = -127;
        assert!(config.validate().is_err());
        config.keys.transpose = -126;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_selection() {
        let config = Config::default();
        assert_eq!(
            config.port_selection(),
            PortSelection::Virtual("midikey".to_string())
        );

        let mut config = Config::default();
        config.midi.connect = Some("UM-ONE".to_string());
        assert_eq!(
            config.port_selection(),
            PortSelection::ConnectPrefix("UM-ONE".to_string())
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.keys.channel = 9;
        config.keys.transpose = -12;
        config.midi.connect = Some("Synth".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.keys.channel, 9);
        assert_eq!(parsed.keys.transpose, -12);
        assert_eq!(parsed.midi.connect.as_deref(), Some("Synth"));
    }
}
