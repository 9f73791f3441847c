//! Serial connection lifecycle: pick, open, read, detect failure, reconnect.

use crate::serial::{auto_pick, SerialBackend, SerialError, SerialLink};
use log::{debug, info, warn};
use std::time::Duration;

/// Open attempts on which an open-failure hint is shown.
const HINT_ATTEMPTS: [u32; 3] = [1, 3, 6];

const BUSY_HINT: &str = "Hint: serial port is busy. Close Arduino/PlatformIO serial monitor, \
                         other bridge windows, and any terminal app using this port.";

const ACCESS_HINT: &str = "Hint: no permission to open the serial port. Add your user to the \
                           port's group (usually dialout or uucp) and log in again.";

/// Operator hint for the `attempt`-th consecutive open failure, if one is due.
pub fn open_failure_hint(err: &SerialError, attempt: u32) -> Option<&'static str> {
    if !HINT_ATTEMPTS.contains(&attempt) {
        return None;
    }
    if err.is_port_busy() {
        Some(BUSY_HINT)
    } else if err.is_access_denied() {
        Some(ACCESS_HINT)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failing,
}

/// Result of [`ConnectionManager::ensure_connected`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A link is open and can be read
    Ready,
    /// No link; sleep one retry interval before trying again
    Wait,
}

/// Result of one bounded read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Timed out with nothing to report
    Idle,
    /// The link failed and has been closed
    Lost,
}

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Device to use verbatim; `None` enables auto-detection
    pub device: Option<String>,
    pub baud: u32,
    pub read_timeout: Duration,
}

pub struct ConnectionManager<B: SerialBackend> {
    backend: B,
    settings: ConnectionSettings,
    state: ConnectionState,
    link: Option<B::Link>,
    device: Option<String>,
    open_failures: u32,
}

impl<B: SerialBackend> ConnectionManager<B> {
    pub fn new(backend: B, settings: ConnectionSettings) -> Self {
        ConnectionManager {
            backend,
            settings,
            state: ConnectionState::Disconnected,
            link: None,
            device: None,
            open_failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Device of the current or most recent connection
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Consecutive failed open attempts
    pub fn open_failures(&self) -> u32 {
        self.open_failures
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Opens a link if none is active.
    pub fn ensure_connected(&mut self) -> Readiness {
        if self.link.is_some() {
            return Readiness::Ready;
        }
        // The caller has slept through the retry interval since the failure.
        self.state = ConnectionState::Disconnected;

        let device = match self.pick_device() {
            Some(device) => device,
            None => {
                info!("Waiting for BECA serial port...");
                return Readiness::Wait;
            }
        };

        self.state = ConnectionState::Connecting;
        match self
            .backend
            .open(&device, self.settings.baud, self.settings.read_timeout)
        {
            Ok(link) => {
                self.open_failures = 0;
                self.link = Some(link);
                self.state = ConnectionState::Connected;
                info!("Serial connected: {} @ {}", device, self.settings.baud);
                self.device = Some(device);
                Readiness::Ready
            }
            Err(e) => {
                self.open_failures += 1;
                self.state = ConnectionState::Failing;
                warn!("Serial open failed on {}: {}", device, e);
                if let Some(hint) = open_failure_hint(&e, self.open_failures) {
                    warn!("{}", hint);
                }
                Readiness::Wait
            }
        }
    }

    fn pick_device(&self) -> Option<String> {
        if let Some(device) = &self.settings.device {
            return Some(device.clone());
        }

        let candidates = match self.backend.enumerate() {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };
        debug!("Serial candidates: {:?}", candidates);
        auto_pick(&candidates).map(|c| c.device.clone())
    }

    /// Reads one line, bounded by the read timeout.
    pub fn read(&mut self) -> ReadOutcome {
        let link = match self.link.as_mut() {
            Some(link) => link,
            None => return ReadOutcome::Idle,
        };

        match link.read_line() {
            Ok(Some(line)) => ReadOutcome::Line(line),
            Ok(None) => ReadOutcome::Idle,
            Err(e) => {
                warn!(
                    "Serial error on {}: {}",
                    self.device.as_deref().unwrap_or("?"),
                    e
                );
                self.release_link();
                self.state = ConnectionState::Failing;
                ReadOutcome::Lost
            }
        }
    }

    /// Best-effort close of the active link.
    pub fn close(&mut self) {
        if self.link.is_some() {
            self.release_link();
            info!(
                "Serial disconnected: {}",
                self.device.as_deref().unwrap_or("?")
            );
        }
        self.state = ConnectionState::Disconnected;
    }

    fn release_link(&mut self) {
        if let Some(link) = self.link.take() {
            if let Err(e) = link.close() {
                debug!("Ignoring serial close error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::{MockEvent, MockSerial, PortCandidate};

    fn settings(device: Option<&str>) -> ConnectionSettings {
        ConnectionSettings {
            device: device.map(str::to_string),
            baud: 115_200,
            read_timeout: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_no_ports_means_wait() {
        let mut manager = ConnectionManager::new(MockSerial::new(vec![]), settings(None));
        assert_eq!(manager.ensure_connected(), Readiness::Wait);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.open_failures(), 0);
    }

    #[test]
    fn test_auto_pick_is_used_without_explicit_device() {
        let backend = MockSerial::new(vec![
            PortCandidate::new("/dev/ttyS0", "", None),
            PortCandidate::new("/dev/ttyUSB0", "USB Serial", None),
        ]);
        backend.push_open_ok(vec![]);
        let mut manager = ConnectionManager::new(backend.clone(), settings(None));
        assert_eq!(manager.ensure_connected(), Readiness::Ready);
        assert_eq!(manager.device(), Some("/dev/ttyUSB0"));
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(backend.journal(), vec!["open:/dev/ttyUSB0"]);
    }

    #[test]
    fn test_explicit_device_skips_enumeration() {
        let backend = MockSerial::new(vec![]);
        backend.push_open_ok(vec![]);
        let mut manager = ConnectionManager::new(backend, settings(Some("COM9")));
        assert_eq!(manager.ensure_connected(), Readiness::Ready);
        assert_eq!(manager.device(), Some("COM9"));
    }

    #[test]
    fn test_timeout_is_not_a_failure() {
        let backend = MockSerial::new(vec![]);
        backend.push_open_ok(vec![MockEvent::Idle, MockEvent::line("@I hi")]);
        let mut manager = ConnectionManager::new(backend, settings(Some("COM9")));
        manager.ensure_connected();
        assert_eq!(manager.read(), ReadOutcome::Idle);
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.read(), ReadOutcome::Line("@I hi".to_string()));
    }

    #[test]
    fn test_failure_counter_resets_on_success() {
        let backend = MockSerial::new(vec![]);
        backend.push_open_err("Access is denied.");
        backend.push_open_err("Access is denied.");
        backend.push_open_ok(vec![]);
        let mut manager = ConnectionManager::new(backend, settings(Some("COM5")));

        assert_eq!(manager.ensure_connected(), Readiness::Wait);
        assert_eq!(manager.state(), ConnectionState::Failing);
        assert_eq!(manager.ensure_connected(), Readiness::Wait);
        assert_eq!(manager.open_failures(), 2);
        assert_eq!(manager.ensure_connected(), Readiness::Ready);
        assert_eq!(manager.open_failures(), 0);
    }

    fn open_error(kind: serialport::ErrorKind, text: &str) -> SerialError {
        SerialError::Open {
            device: "COM5".to_string(),
            source: serialport::Error::new(kind, text),
        }
    }

    #[test]
    fn test_busy_hint_on_attempts_one_three_six() {
        let busy = open_error(serialport::ErrorKind::Unknown, "Access is denied.");
        for attempt in [1, 3, 6] {
            assert_eq!(open_failure_hint(&busy, attempt), Some(BUSY_HINT), "attempt {}", attempt);
        }
        for attempt in [2, 4, 5, 7, 12] {
            assert_eq!(open_failure_hint(&busy, attempt), None, "attempt {}", attempt);
        }
    }

    #[test]
    fn test_no_hint_for_other_failures() {
        let missing = open_error(serialport::ErrorKind::NoDevice, "No such file or directory");
        assert_eq!(open_failure_hint(&missing, 1), None);
    }

    #[test]
    fn test_permission_hint_depends_on_platform() {
        let denied = open_error(
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
            "Permission denied",
        );
        let expected = if cfg!(windows) { BUSY_HINT } else { ACCESS_HINT };
        assert_eq!(open_failure_hint(&denied, 1), Some(expected));
        assert_eq!(open_failure_hint(&denied, 2), None);
    }

    #[test]
    fn test_close_when_disconnected_is_harmless() {
        let mut manager = ConnectionManager::new(MockSerial::new(vec![]), settings(None));
        manager.close();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.read(), ReadOutcome::Idle);
    }
}
