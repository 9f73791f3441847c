use crate::midi::{MidiError, MidiMessage, MidiOutputProvider, MidiSink, Result};
use std::sync::{Arc, Mutex};

/// In-memory sink that records every message it is given.
///
/// Clones share the same record, so a test can keep one handle while the
/// bridge owns the other.
#[derive(Debug, Clone)]
pub struct MockMidiSink {
    name: String,
    sent: Arc<Mutex<Vec<MidiMessage>>>,
    closed: Arc<Mutex<bool>>,
}

impl MockMidiSink {
    pub fn new(name: &str) -> Self {
        MockMidiSink {
            name: name.to_string(),
            sent: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn sent(&self) -> Vec<MidiMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.lock().map(|c| *c).unwrap_or(false)
    }
}

impl MidiSink for MockMidiSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        if self.is_closed() {
            return Err(MidiError::Send("output already closed".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(*msg);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn close(&mut self) {
        if let Ok(mut closed) = self.closed.lock() {
            *closed = true;
        }
    }
}

/// MIDI subsystem with a fixed list of outputs
#[derive(Debug, Clone, Default)]
pub struct MockMidiProvider {
    pub outputs: Vec<String>,
    pub inputs: Vec<String>,
    pub supports_virtual: bool,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockMidiProvider {
    pub fn new(outputs: &[&str], supports_virtual: bool) -> Self {
        MockMidiProvider {
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            inputs: Vec::new(),
            supports_virtual,
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Names passed to successful open calls, virtual ones prefixed `virtual:`
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(entry);
        }
    }
}

impl MidiOutputProvider for MockMidiProvider {
    type Sink = MockMidiSink;

    fn output_names(&self) -> Result<Vec<String>> {
        Ok(self.outputs.clone())
    }

    fn input_names(&self) -> Result<Vec<String>> {
        Ok(self.inputs.clone())
    }

    fn open_output(&self, name: &str) -> Result<MockMidiSink> {
        if !self.outputs.iter().any(|o| o == name) {
            return Err(MidiError::Connection(format!(
                "output port '{}' not found",
                name
            )));
        }
        self.record(name.to_string());
        Ok(MockMidiSink::new(name))
    }

    fn open_virtual_output(&self, name: &str) -> Result<MockMidiSink> {
        if !self.supports_virtual {
            return Err(MidiError::VirtualUnsupported);
        }
        self.record(format!("virtual:{}", name));
        Ok(MockMidiSink::new(name))
    }
}
