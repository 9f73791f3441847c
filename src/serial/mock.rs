use crate::serial::{PortCandidate, Result, SerialBackend, SerialError, SerialLink};
use crate::stop::StopToken;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted read on a mock link
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    Line(String),
    /// A read timeout with no data
    Idle,
    /// A transport failure
    ReadError(String),
}

impl MockEvent {
    pub fn line(text: &str) -> Self {
        MockEvent::Line(text.to_string())
    }
}

#[derive(Debug, Default)]
struct MockState {
    ports: Vec<PortCandidate>,
    opens: VecDeque<std::result::Result<Vec<MockEvent>, String>>,
    journal: Vec<String>,
}

/// Scripted serial subsystem.
///
/// Each `open` consumes the next scripted outcome. Every open and close is
/// written to a journal as `open:<device>`, `open-failed:<device>` or
/// `close:<device>`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSerial {
    state: Arc<Mutex<MockState>>,
    stop_when_exhausted: Option<StopToken>,
}

impl MockSerial {
    pub fn new(ports: Vec<PortCandidate>) -> Self {
        let state = MockState {
            ports,
            ..MockState::default()
        };
        MockSerial {
            state: Arc::new(Mutex::new(state)),
            stop_when_exhausted: None,
        }
    }

    /// Next open succeeds and the link replays `script`
    pub fn push_open_ok(&self, script: Vec<MockEvent>) {
        if let Ok(mut state) = self.state.lock() {
            state.opens.push_back(Ok(script));
        }
    }

    /// Next open fails with `message`
    pub fn push_open_err(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.opens.push_back(Err(message.to_string()));
        }
    }

    pub fn set_ports(&self, ports: Vec<PortCandidate>) {
        if let Ok(mut state) = self.state.lock() {
            state.ports = ports;
        }
    }

    /// Stops `token` once a link runs out of script or no open outcome is left.
    pub fn stop_when_exhausted(mut self, token: StopToken) -> Self {
        self.stop_when_exhausted = Some(token);
        self
    }

    pub fn journal(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.journal.clone())
            .unwrap_or_default()
    }

    fn note(&self, entry: String) {
        if let Ok(mut state) = self.state.lock() {
            state.journal.push(entry);
        }
    }

    fn exhausted(&self) {
        if let Some(token) = &self.stop_when_exhausted {
            token.stop();
        }
    }
}

impl SerialBackend for MockSerial {
    type Link = MockLink;

    fn enumerate(&self) -> Result<Vec<PortCandidate>> {
        Ok(self
            .state
            .lock()
            .map(|s| s.ports.clone())
            .unwrap_or_default())
    }

    fn open(&self, device: &str, _baud: u32, _read_timeout: Duration) -> Result<MockLink> {
        let next = self.state.lock().ok().and_then(|mut s| s.opens.pop_front());
        match next {
            Some(Ok(script)) => {
                self.note(format!("open:{}", device));
                Ok(MockLink {
                    device: device.to_string(),
                    script: script.into(),
                    backend: self.clone(),
                })
            }
            Some(Err(message)) => {
                self.note(format!("open-failed:{}", device));
                Err(open_error(device, &message))
            }
            None => {
                self.note(format!("open-failed:{}", device));
                self.exhausted();
                Err(open_error(device, "no scripted open left"))
            }
        }
    }
}

fn open_error(device: &str, message: &str) -> SerialError {
    SerialError::Open {
        device: device.to_string(),
        source: serialport::Error::new(serialport::ErrorKind::Unknown, message),
    }
}

/// A link replaying a script of reads
#[derive(Debug)]
pub struct MockLink {
    device: String,
    script: VecDeque<MockEvent>,
    backend: MockSerial,
}

impl SerialLink for MockLink {
    fn read_line(&mut self) -> Result<Option<String>> {
        match self.script.pop_front() {
            Some(MockEvent::Line(line)) => Ok(Some(line)),
            Some(MockEvent::Idle) => Ok(None),
            Some(MockEvent::ReadError(message)) => {
                Err(SerialError::Read(io::Error::new(io::ErrorKind::Other, message)))
            }
            None => {
                self.backend.exhausted();
                Ok(None)
            }
        }
    }

    fn close(self) -> Result<()> {
        self.backend.note(format!("close:{}", self.device));
        Ok(())
    }
}
