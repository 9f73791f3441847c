//! MIDI output side of the bridge
//!
//! This module provides:
//! - [`MidiMessage`], the channel voice messages decoded from the firmware
//! - [`MidiSink`] and [`MidiOutputProvider`] traits over the host MIDI subsystem
//! - [`MidirProvider`] for real ports via midir
//! - [`MockMidiProvider`] and [`MockMidiSink`] for testing
//! - output port selection and the platform acquisition strategy
//!
mod engine;
pub mod midir_engine;
pub mod mock_engine;
pub mod output;

pub use engine::{MidiError, MidiMessage, MidiOutputProvider, MidiSink, Result};

pub use midir_engine::{MidirProvider, MidirSink};
pub use mock_engine::{MockMidiProvider, MockMidiSink};

pub use output::{acquire_output, find_existing_output, OutputStrategy, PortMode};

// Set default provider type
pub type DefaultMidiProvider = MidirProvider;
