//! Line protocol spoken by the instrument firmware.
//!
//! Each newline-terminated line is one of:
//! - `@I <free text>`: an information line, logged but never forwarded
//! - `@M <status> <data1> <data2>`: a MIDI event as three two-digit hex tokens
//!
//! Anything else is firmware noise and is dropped without an error.

use crate::midi::MidiMessage;

const INFO_MARKER: &str = "@I ";
const MIDI_MARKER: &str = "@M ";

/// A successfully decoded protocol line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Free text reported by the firmware.
    Info(String),
    /// A MIDI event ready for the output sink.
    Midi(MidiMessage),
}

/// Decodes one already-trimmed line.
///
/// Returns `None` for unrecognized shapes, bad hex and unknown status nibbles.
pub fn decode(line: &str) -> Option<Decoded> {
    if let Some(text) = line.strip_prefix(INFO_MARKER) {
        return Some(Decoded::Info(text.to_string()));
    }
    if line.starts_with(MIDI_MARKER) {
        return decode_midi(line).map(Decoded::Midi);
    }
    None
}

fn decode_midi(line: &str) -> Option<MidiMessage> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4 {
        return None;
    }

    let status = parse_hex(parts[1])?;
    // Data bytes lose their high bit instead of rejecting the line.
    let d1 = parse_hex(parts[2])? & 0x7F;
    let d2 = parse_hex(parts[3])? & 0x7F;

    let channel = status & 0x0F;
    match status & 0xF0 {
        0x80 => Some(MidiMessage::note_off(channel, d1, d2)),
        0x90 if d2 == 0 => Some(MidiMessage::note_off(channel, d1, 0)),
        0x90 => Some(MidiMessage::note_on(channel, d1, d2)),
        0xA0 => Some(MidiMessage::poly_aftertouch(channel, d1, d2)),
        0xB0 => Some(MidiMessage::control_change(channel, d1, d2)),
        0xC0 => Some(MidiMessage::program_change(channel, d1)),
        0xD0 => Some(MidiMessage::channel_aftertouch(channel, d1)),
        0xE0 => Some(MidiMessage::pitch_bend(
            channel,
            (((d2 as i16) << 7) | d1 as i16) - 8192,
        )),
        _ => None,
    }
}

fn parse_hex(token: &str) -> Option<u8> {
    // `from_str_radix` accepts a leading sign, the wire format does not.
    if token.starts_with('+') {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}
