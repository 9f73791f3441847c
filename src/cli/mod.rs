use clap::Parser;
use std::path::PathBuf;

/// BECA serial-to-MIDI bridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Serial port (example: COM5 or /dev/ttyUSB0). Leave empty for auto-detection.
    #[arg(long)]
    pub port: Option<String>,

    /// Serial baud rate [default: 115200]
    #[arg(long)]
    pub baud: Option<u32>,

    /// Virtual/existing MIDI port name or 'auto' [default: auto]
    #[arg(long)]
    pub midi_port: Option<String>,

    /// Reconnect retry interval in seconds [default: 2.0]
    #[arg(long)]
    pub retry_seconds: Option<f64>,

    /// List serial ports and exit
    #[arg(long)]
    pub list: bool,

    /// List MIDI input/output ports and exit
    #[arg(long)]
    pub midi_list: bool,

    /// Settings file (TOML); defaults to beca-link.toml if present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to the terminal
    #[arg(short, long)]
    pub verbose: bool,
}
