use crate::serial::{LineBuffer, PortCandidate, Result, SerialBackend, SerialError, SerialLink};
use log::debug;
use serialport::{SerialPort, SerialPortType};
use std::io::{self, Read};
use std::time::Duration;

/// Host serial ports via the `serialport` crate
#[derive(Debug, Default)]
pub struct NativeSerial;

impl NativeSerial {
    pub fn new() -> Self {
        NativeSerial
    }
}

impl SerialBackend for NativeSerial {
    type Link = NativeLink;

    fn enumerate(&self) -> Result<Vec<PortCandidate>> {
        let ports = serialport::available_ports().map_err(SerialError::Enumerate)?;
        Ok(ports
            .into_iter()
            .map(|p| {
                let (description, manufacturer) = match p.port_type {
                    SerialPortType::UsbPort(info) => (
                        info.product.unwrap_or_else(|| {
                            format!("USB VID:{:04x} PID:{:04x}", info.vid, info.pid)
                        }),
                        info.manufacturer,
                    ),
                    SerialPortType::PciPort => ("PCI".to_string(), None),
                    SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None),
                    SerialPortType::Unknown => (String::new(), None),
                };
                PortCandidate {
                    device: p.port_name,
                    description,
                    manufacturer,
                }
            })
            .collect())
    }

    fn open(&self, device: &str, baud: u32, read_timeout: Duration) -> Result<NativeLink> {
        let port = serialport::new(device, baud)
            .timeout(read_timeout)
            .open()
            .map_err(|source| SerialError::Open {
                device: device.to_string(),
                source,
            })?;
        debug!("Opened {} at {} baud", device, baud);

        Ok(NativeLink {
            port,
            lines: LineBuffer::new(),
            scratch: [0u8; 256],
        })
    }
}

/// An open serial port with its line buffer
pub struct NativeLink {
    port: Box<dyn SerialPort>,
    lines: LineBuffer,
    scratch: [u8; 256],
}

impl SerialLink for NativeLink {
    fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.lines.pop_line() {
            return Ok(Some(line));
        }

        match self.port.read(&mut self.scratch) {
            // Readable but empty means the device went away.
            Ok(0) => {
                return Err(SerialError::Read(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "device reported data but returned none (disconnected?)",
                )))
            }
            Ok(n) => self.lines.push(&self.scratch[..n]),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(SerialError::Read(e)),
        }

        Ok(self.lines.pop_line())
    }

    fn close(self) -> Result<()> {
        // The handle is released on drop.
        drop(self.port);
        Ok(())
    }
}
