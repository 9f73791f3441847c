use thiserror::Error;

/// Error type for MIDI output operations
#[derive(Debug, Error)]
pub enum MidiError {
    /// The MIDI subsystem could not be initialized
    #[error("MIDI init error: {0}")]
    Init(String),
    /// Error when opening or creating an output port
    #[error("MIDI connection error: {0}")]
    Connection(String),
    /// Error when sending a MIDI message
    #[error("MIDI send error: {0}")]
    Send(String),
    /// This platform cannot create virtual ports
    #[error("virtual MIDI ports are not supported on this platform")]
    VirtualUnsupported,
    /// No output could be acquired at startup
    #[error("{0}")]
    OutputUnavailable(String),
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// A channel voice message decoded from the firmware.
///
/// Channel is always in 0..=15 and data fields in 0..=127 when built through
/// the constructors. Pitch bend is a signed value in -8192..=8191.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOff { channel: u8, note: u8, velocity: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    PolyAftertouch { channel: u8, note: u8, value: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelAftertouch { channel: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
}

impl MidiMessage {
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        MidiMessage::NoteOff {
            channel: channel & 0x0F,
            note: note & 0x7F,
            velocity: velocity & 0x7F,
        }
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        MidiMessage::NoteOn {
            channel: channel & 0x0F,
            note: note & 0x7F,
            velocity: velocity & 0x7F,
        }
    }

    pub fn poly_aftertouch(channel: u8, note: u8, value: u8) -> Self {
        MidiMessage::PolyAftertouch {
            channel: channel & 0x0F,
            note: note & 0x7F,
            value: value & 0x7F,
        }
    }

    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        MidiMessage::ControlChange {
            channel: channel & 0x0F,
            controller: controller & 0x7F,
            value: value & 0x7F,
        }
    }

    pub fn program_change(channel: u8, program: u8) -> Self {
        MidiMessage::ProgramChange {
            channel: channel & 0x0F,
            program: program & 0x7F,
        }
    }

    pub fn channel_aftertouch(channel: u8, value: u8) -> Self {
        MidiMessage::ChannelAftertouch {
            channel: channel & 0x0F,
            value: value & 0x7F,
        }
    }

    pub fn pitch_bend(channel: u8, value: i16) -> Self {
        MidiMessage::PitchBend {
            channel: channel & 0x0F,
            value: value.clamp(-8192, 8191),
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::PolyAftertouch { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::ProgramChange { channel, .. }
            | MidiMessage::ChannelAftertouch { channel, .. }
            | MidiMessage::PitchBend { channel, .. } => channel,
        }
    }

    /// Raw bytes as they go out on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => vec![0x80 | (channel & 0x0F), note, velocity],
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => vec![0x90 | (channel & 0x0F), note, velocity],
            MidiMessage::PolyAftertouch {
                channel,
                note,
                value,
            } => vec![0xA0 | (channel & 0x0F), note, value],
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => vec![0xB0 | (channel & 0x0F), controller, value],
            MidiMessage::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program]
            }
            MidiMessage::ChannelAftertouch { channel, value } => {
                vec![0xD0 | (channel & 0x0F), value]
            }
            MidiMessage::PitchBend { channel, value } => {
                let raw = (value as i32 + 8192) as u16;
                vec![
                    0xE0 | (channel & 0x0F),
                    (raw & 0x7F) as u8,
                    ((raw >> 7) & 0x7F) as u8,
                ]
            }
        }
    }
}

/// Destination for decoded MIDI messages
pub trait MidiSink {
    /// Sends one message to the output port
    fn send(&mut self, msg: &MidiMessage) -> Result<()>;

    /// Name of the port this sink writes to
    fn name(&self) -> &str;

    /// Releases the port. Calling it more than once is a no-op.
    fn close(&mut self);
}

/// The host MIDI subsystem as seen by output acquisition
pub trait MidiOutputProvider {
    type Sink: MidiSink;

    /// Names of all output ports currently visible
    fn output_names(&self) -> Result<Vec<String>>;

    /// Names of all input ports currently visible
    fn input_names(&self) -> Result<Vec<String>>;

    /// Opens an existing output port by its exact name
    fn open_output(&self, name: &str) -> Result<Self::Sink>;

    /// Creates a new virtual output port visible to other applications
    fn open_virtual_output(&self, name: &str) -> Result<Self::Sink>;
}
