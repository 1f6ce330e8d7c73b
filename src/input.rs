//! Input device handling
//!
//! Enumerates and opens evdev devices, holds the optional exclusive grab
//! for the duration of the read loop, and drives the translator over the
//! resulting key-event stream. The loop itself is generic over any event
//! sequence so it can be exercised with synthetic events in tests.

use std::path::Path;

use evdev::{Device, InputEvent, InputEventKind};

use crate::error::{Error, Result};
use crate::midi::MidiSink;
use crate::translate::{KeyEvent, KeyKind, Translator};

/// List available input devices as (path, name) pairs
pub fn list_devices() -> Vec<(String, String)> {
    evdev::enumerate()
        .map(|(path, device)| {
            let name = device.name().unwrap_or("unknown").to_string();
            (path.display().to_string(), name)
        })
        .collect()
}

/// Open an evdev input device by path
pub fn open_device(path: &Path) -> Result<Device> {
    Device::open(path).map_err(|e| Error::Device(format!("{}: {}", path.display(), e)))
}

/// Holds an exclusive grab on a device for as long as it lives.
///
/// The grab is released in Drop, so every exit path out of the read loop
/// (end of stream, error, panic unwind) gives the device back.
pub struct GrabGuard<'a> {
    device: &'a mut Device,
    grabbed: bool,
}

impl<'a> GrabGuard<'a> {
    pub fn new(device: &'a mut Device, grab: bool) -> Result<Self> {
        if grab {
            device
                .grab()
                .map_err(|e| Error::Device(format!("grab failed: {}", e)))?;
            log::info!("Grabbed input device");
        }
        Ok(Self { device, grabbed: grab })
    }

    pub fn device_mut(&mut self) -> &mut Device {
        self.device
    }
}

impl Drop for GrabGuard<'_> {
    fn drop(&mut self) {
        if self.grabbed {
            if let Err(e) = self.device.ungrab() {
                log::warn!("Failed to release device grab: {}", e);
            }
        }
    }
}

/// Convert a raw evdev event into a key event, if it is one.
///
/// Non-key events (sync, LED, misc) and key values other than
/// press/release/repeat are dropped here so the translator only ever sees
/// key events.
pub fn key_event(ev: &InputEvent) -> Option<KeyEvent> {
    match ev.kind() {
        InputEventKind::Key(code) => {
            KeyKind::from_raw(ev.value()).map(|kind| KeyEvent::new(code, kind))
        }
        _ => None,
    }
}

/// Drive the translator over a sequence of key events, writing each
/// produced message to the sink in event order.
pub fn run_loop<I, S>(events: I, translator: &Translator, sink: &mut S) -> Result<()>
where
    I: IntoIterator<Item = KeyEvent>,
    S: MidiSink + ?Sized,
{
    for event in events {
        if let Some(message) = translator.translate(event) {
            log::debug!("Sent {:?}", message);
            sink.send(message)?;
        }
    }
    Ok(())
}

/// Blocking read loop over a real device.
///
/// Reads until the device disappears or a write fails; both are fatal.
/// The grab, if requested, is held for exactly the duration of this call.
pub fn run_device(
    device: &mut Device,
    translator: &Translator,
    sink: &mut dyn MidiSink,
    grab: bool,
) -> Result<()> {
    let mut guard = GrabGuard::new(device, grab)?;
    loop {
        let events: Vec<KeyEvent> = guard
            .device_mut()
            .fetch_events()
            .map_err(|e| Error::Device(format!("read failed: {}", e)))?
            .filter_map(|ev| key_event(&ev))
            .collect();
        run_loop(events, translator, sink)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyMap;
    use crate::midi::CaptureSink;
    use evdev::Key;

    #[test]
    fn test_loop_produces_messages_in_event_order() {
        let translator = Translator::new(KeyMap::standard(), 0, 0);
        let mut sink = CaptureSink::default();

        let events = vec![
            KeyEvent::new(Key::KEY_Z, KeyKind::Pressed),
            KeyEvent::new(Key::KEY_X, KeyKind::Pressed),
            KeyEvent::new(Key::KEY_Z, KeyKind::Released),
            KeyEvent::new(Key::KEY_X, KeyKind::Released),
        ];

        run_loop(events, &translator, &mut sink).unwrap();

        assert_eq!(
            sink.messages,
            vec![
                [0x90, 60, 127],
                [0x90, 62, 127],
                [0x80, 60, 0],
                [0x80, 62, 0],
            ]
        );
    }

    #[test]
    fn test_loop_skips_repeats_and_unmapped_keys() {
        let translator = Translator::new(KeyMap::standard(), 0, 0);
        let mut sink = CaptureSink::default();

        let events = vec![
            KeyEvent::new(Key::KEY_Z, KeyKind::Pressed),
            KeyEvent::new(Key::KEY_Z, KeyKind::Repeated),
            KeyEvent::new(Key::KEY_Z, KeyKind::Repeated),
            KeyEvent::new(Key::KEY_SPACE, KeyKind::Pressed),
            KeyEvent::new(Key::KEY_SPACE, KeyKind::Released),
            KeyEvent::new(Key::KEY_Z, KeyKind::Released),
        ];

        run_loop(events, &translator, &mut sink).unwrap();

        assert_eq!(sink.messages, vec![[0x90, 60, 127], [0x80, 60, 0]]);
    }

    #[test]
    fn test_loop_applies_channel_and_transpose() {
        // Channel 10 (internal 9, the drum channel), transposed down an octave
        let translator = Translator::new(KeyMap::standard(), 9, -12);
        let mut sink = CaptureSink::default();

        let events = vec![
            KeyEvent::new(Key::KEY_Z, KeyKind::Pressed),
            KeyEvent::new(Key::KEY_Z, KeyKind::Released),
        ];

        run_loop(events, &translator, &mut sink).unwrap();

        assert_eq!(sink.messages, vec![[0x99, 48, 127], [0x89, 48, 0]]);
    }

    #[test]
    fn test_key_event_conversion() {
        let press = InputEvent::new(evdev::EventType::KEY, Key::KEY_Q.code(), 1);
        let ev = key_event(&press).unwrap();
        assert_eq!(ev.code, Key::KEY_Q);
        assert_eq!(ev.kind, KeyKind::Pressed);

        let release = InputEvent::new(evdev::EventType::KEY, Key::KEY_Q.code(), 0);
        assert_eq!(key_event(&release).unwrap().kind, KeyKind::Released);

        // Non-key events never become key events
        let sync = InputEvent::new(evdev::EventType::SYNCHRONIZATION, 0, 0);
        assert!(key_event(&sync).is_none());
    }
}
