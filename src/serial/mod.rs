//! Serial side of the bridge
//!
//! - [`PortCandidate`] and the auto-pick heuristic
//! - [`SerialBackend`] and [`SerialLink`] traits over the host serial subsystem
//! - [`NativeSerial`] for real devices via the `serialport` crate
//! - [`MockSerial`] for scripted tests

mod line_buffer;
pub mod mock;
pub mod native;
mod select;

use std::io;
use std::time::Duration;
use thiserror::Error;

pub use line_buffer::LineBuffer;
pub use mock::{MockEvent, MockSerial};
pub use native::{NativeLink, NativeSerial};
pub use select::{auto_pick, score_candidate};

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("could not enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    #[error("{source}")]
    Open {
        device: String,
        #[source]
        source: serialport::Error,
    },

    #[error("read failed: {0}")]
    Read(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;

impl SerialError {
    /// Best-effort check for a port held open by another process.
    ///
    /// Windows reports a port held elsewhere as permission denied; on unix
    /// that kind means missing device permissions instead.
    pub fn is_port_busy(&self) -> bool {
        match self {
            SerialError::Open { source, .. } => {
                if cfg!(windows) && is_permission_denied(source) {
                    return true;
                }
                let text = source.description.to_lowercase();
                text.contains("access is denied") || text.contains("busy")
            }
            _ => false,
        }
    }

    /// Open refused for lack of device permissions (unix only).
    pub fn is_access_denied(&self) -> bool {
        match self {
            SerialError::Open { source, .. } => !cfg!(windows) && is_permission_denied(source),
            _ => false,
        }
    }
}

fn is_permission_denied(err: &serialport::Error) -> bool {
    err.kind == serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied)
}

/// A serial device found during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub device: String,
    pub description: String,
    pub manufacturer: Option<String>,
}

impl PortCandidate {
    pub fn new(device: &str, description: &str, manufacturer: Option<&str>) -> Self {
        PortCandidate {
            device: device.to_string(),
            description: description.to_string(),
            manufacturer: manufacturer.map(str::to_string),
        }
    }
}

/// An open serial connection delivering text lines
pub trait SerialLink {
    /// Reads the next complete line, trimmed.
    ///
    /// `Ok(None)` means the read timed out without a full line and is not an error.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Releases the device.
    fn close(self) -> Result<()>;
}

/// The host serial subsystem
pub trait SerialBackend {
    type Link: SerialLink;

    fn enumerate(&self) -> Result<Vec<PortCandidate>>;

    fn open(&self, device: &str, baud: u32, read_timeout: Duration) -> Result<Self::Link>;
}
