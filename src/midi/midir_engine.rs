use crate::midi::{MidiError, MidiMessage, MidiOutputProvider, MidiSink, Result};
use log::debug;
use midir::{MidiInput, MidiOutput, MidiOutputConnection, MidiOutputPort};

const CLIENT_NAME: &str = "beca-link";

/// Host MIDI subsystem backed by midir
#[derive(Debug, Default)]
pub struct MidirProvider;

impl MidirProvider {
    pub fn new() -> Self {
        MidirProvider
    }

    fn output() -> Result<MidiOutput> {
        MidiOutput::new(CLIENT_NAME).map_err(|e| MidiError::Init(e.to_string()))
    }
}

impl MidiOutputProvider for MidirProvider {
    type Sink = MidirSink;

    fn output_names(&self) -> Result<Vec<String>> {
        let midi_out = Self::output()?;
        Ok(midi_out
            .ports()
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect())
    }

    fn input_names(&self) -> Result<Vec<String>> {
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| MidiError::Init(e.to_string()))?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect())
    }

    fn open_output(&self, name: &str) -> Result<MidirSink> {
        let midi_out = Self::output()?;

        let out_ports = midi_out.ports();
        let port: &MidiOutputPort = out_ports
            .iter()
            .find(|p| midi_out.port_name(p).map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| MidiError::Connection(format!("output port '{}' not found", name)))?;

        debug!("Connecting to MIDI output port: {}", name);
        let connection = midi_out
            .connect(port, "beca-link-output")
            .map_err(|e| MidiError::Connection(e.to_string()))?;

        Ok(MidirSink {
            name: name.to_string(),
            connection: Some(connection),
        })
    }

    #[cfg(unix)]
    fn open_virtual_output(&self, name: &str) -> Result<MidirSink> {
        use midir::os::unix::VirtualOutput;

        let midi_out = Self::output()?;
        debug!("Creating virtual MIDI output port: {}", name);
        let connection = midi_out
            .create_virtual(name)
            .map_err(|e| MidiError::Connection(e.to_string()))?;

        Ok(MidirSink {
            name: name.to_string(),
            connection: Some(connection),
        })
    }

    #[cfg(not(unix))]
    fn open_virtual_output(&self, _name: &str) -> Result<MidirSink> {
        Err(MidiError::VirtualUnsupported)
    }
}

/// An open midir output connection
pub struct MidirSink {
    name: String,
    connection: Option<MidiOutputConnection>,
}

impl MidiSink for MidirSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        let conn = self
            .connection
            .as_mut()
            .ok_or_else(|| MidiError::Send("output already closed".to_string()))?;
        conn.send(&msg.to_bytes())
            .map_err(|e| MidiError::Send(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            let _ = conn.close();
            debug!("Closed MIDI output port: {}", self.name);
        }
    }
}

impl Drop for MidirSink {
    fn drop(&mut self) {
        self.close();
    }
}
