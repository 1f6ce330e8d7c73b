//! MIDI output backends
//!
//! Resolves the output destination (a freshly created virtual port, or an
//! existing port matched by name prefix) and wraps it behind the `MidiSink`
//! trait so the event loop can be tested without a MIDI subsystem.

use midir::{MidiOutput, MidiOutputConnection};

use crate::error::{Error, Result};

/// Client name registered with the MIDI subsystem
pub const CLIENT_NAME: &str = "midikey";

/// How the output destination is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelection {
    /// Create a virtual output port with this name
    Virtual(String),
    /// Connect to the first existing output port whose name starts with
    /// this prefix
    ConnectPrefix(String),
}

/// Find the first port name starting with `prefix` (case-sensitive).
///
/// Ports are scanned in enumeration order; the first match wins even if a
/// later name matches more of the prefix.
pub fn find_port_by_prefix(names: &[String], prefix: &str) -> Result<usize> {
    names
        .iter()
        .position(|name| name.starts_with(prefix))
        .ok_or_else(|| Error::NoPortMatch {
            prefix: prefix.to_string(),
        })
}

/// List the names of all available MIDI output ports
pub fn list_output_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new(CLIENT_NAME)?;
    Ok(port_names(&midi_out))
}

fn port_names(midi_out: &MidiOutput) -> Vec<String> {
    midi_out
        .ports()
        .iter()
        .map(|port| midi_out.port_name(port).unwrap_or_default())
        .collect()
}

/// Open the MIDI output destination described by `selection`.
///
/// Returns the connection together with the name of the port that was
/// actually opened. The connection is exclusively owned by the caller for
/// the rest of the run.
pub fn open_output(selection: &PortSelection) -> Result<(MidiOutputConnection, String)> {
    let midi_out = MidiOutput::new(CLIENT_NAME)?;
    match selection {
        PortSelection::Virtual(name) => {
            let conn = create_virtual(midi_out, name)?;
            log::info!("Opened virtual port \"{}\"", name);
            Ok((conn, name.clone()))
        }
        PortSelection::ConnectPrefix(prefix) => {
            let ports = midi_out.ports();
            let names = port_names(&midi_out);
            let index = find_port_by_prefix(&names, prefix)?;
            let conn = midi_out
                .connect(&ports[index], CLIENT_NAME)
                .map_err(|e| Error::MidiConnect(e.to_string()))?;
            log::info!("Connected to port \"{}\"", names[index]);
            Ok((conn, names[index].clone()))
        }
    }
}

#[cfg(unix)]
fn create_virtual(midi_out: MidiOutput, name: &str) -> Result<MidiOutputConnection> {
    use midir::os::unix::VirtualOutput;
    midi_out
        .create_virtual(name)
        .map_err(|e| Error::MidiConnect(e.to_string()))
}

#[cfg(not(unix))]
fn create_virtual(_midi_out: MidiOutput, _name: &str) -> Result<MidiOutputConnection> {
    Err(Error::Config(
        "virtual MIDI ports are not supported on this platform; use --connect".to_string(),
    ))
}

/// Destination for translated MIDI messages
pub trait MidiSink {
    /// Send one 3-byte MIDI message
    fn send(&mut self, message: [u8; 3]) -> Result<()>;
}

impl MidiSink for MidiOutputConnection {
    fn send(&mut self, message: [u8; 3]) -> Result<()> {
        MidiOutputConnection::send(self, &message)?;
        Ok(())
    }
}

/// Sink that collects messages in memory (for tests and dry runs)
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub messages: Vec<[u8; 3]>,
}

impl MidiSink for CaptureSink {
    fn send(&mut self, message: [u8; 3]) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}
