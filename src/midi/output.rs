//! MIDI output selection and startup acquisition.

use crate::midi::{MidiError, MidiOutputProvider, Result};
use log::{info, warn};
use std::fmt;

/// Sentinel output name asking for heuristic selection
pub const AUTO: &str = "auto";

/// Name given to the virtual port when the operator asked for `auto`
pub const DEFAULT_VIRTUAL_NAME: &str = "BECA Serial MIDI";

/// Loopback drivers preferred by `auto`, in order.
const LOOPBACK_KEYWORDS: &[&str] = &["beca serial midi", "loopmidi", "loopbe", "internal midi"];

/// Built-in synth that `auto` avoids when anything else is available.
const SYSTEM_SYNTH_KEYWORD: &str = "microsoft gs wavetable";

pub fn is_auto(requested: &str) -> bool {
    requested.trim().eq_ignore_ascii_case(AUTO)
}

/// Picks an existing output port for `requested` among `available`.
///
/// A concrete name matches exactly (ignoring case) first, then as a
/// substring. `auto` prefers loopback drivers, then anything but the
/// system synth, then the first port. `None` when nothing matches.
pub fn find_existing_output<'a>(requested: &str, available: &'a [String]) -> Option<&'a str> {
    if available.is_empty() {
        return None;
    }

    if is_auto(requested) {
        let preferred = LOOPBACK_KEYWORDS.iter().find_map(|key| {
            available
                .iter()
                .find(|name| name.to_lowercase().contains(key))
        });
        let chosen = preferred
            .or_else(|| {
                available
                    .iter()
                    .find(|name| !name.to_lowercase().contains(SYSTEM_SYNTH_KEYWORD))
            })
            .unwrap_or(&available[0]);
        return Some(chosen.as_str());
    }

    let target = requested.to_lowercase();
    available
        .iter()
        .find(|name| name.to_lowercase() == target)
        .or_else(|| {
            available
                .iter()
                .find(|name| name.to_lowercase().contains(&target))
        })
        .map(String::as_str)
}

/// How the output port is obtained on this platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStrategy {
    /// User code cannot create ports; an existing loopback output is required
    ExistingOnly,
    /// Create a virtual port, fall back to an existing output
    VirtualThenExisting,
}

impl OutputStrategy {
    pub fn for_platform() -> Self {
        if cfg!(windows) {
            OutputStrategy::ExistingOnly
        } else {
            OutputStrategy::VirtualThenExisting
        }
    }
}

/// Whether the acquired port was created by us or already existed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMode {
    Virtual,
    Existing,
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortMode::Virtual => write!(f, "virtual"),
            PortMode::Existing => write!(f, "existing"),
        }
    }
}

/// Opens the MIDI output once at startup.
///
/// Any error returned here is fatal for the bridge; its message lists every
/// output that was visible.
pub fn acquire_output<P: MidiOutputProvider>(
    provider: &P,
    requested: &str,
    strategy: OutputStrategy,
) -> Result<(P::Sink, PortMode)> {
    if strategy == OutputStrategy::VirtualThenExisting {
        let virtual_name = if is_auto(requested) {
            DEFAULT_VIRTUAL_NAME
        } else {
            requested
        };
        match provider.open_virtual_output(virtual_name) {
            Ok(sink) => return Ok((sink, PortMode::Virtual)),
            Err(e) => warn!(
                "Could not create virtual MIDI port '{}': {}. Looking for an existing output.",
                virtual_name, e
            ),
        }
    }

    let available = provider.output_names()?;
    info!("Available MIDI output ports: {:?}", available);

    match find_existing_output(requested, &available) {
        Some(name) => {
            let sink = provider.open_output(name).map_err(|e| {
                MidiError::OutputUnavailable(format!(
                    "Could not open MIDI output port '{}': {}\nAvailable outputs: {:?}",
                    name, e, available
                ))
            })?;
            Ok((sink, PortMode::Existing))
        }
        None => Err(MidiError::OutputUnavailable(not_found_message(
            requested, &available, strategy,
        ))),
    }
}

fn not_found_message(requested: &str, available: &[String], strategy: OutputStrategy) -> String {
    match strategy {
        OutputStrategy::ExistingOnly => {
            let suggested = if is_auto(requested) {
                DEFAULT_VIRTUAL_NAME
            } else {
                requested
            };
            format!(
                "MIDI output port not found.\nRequested: '{}'\nAvailable outputs: {:?}\n\
                 Create/enable a loopback output (for example a loopMIDI port named '{}') \
                 and restart this bridge.",
                requested, available, suggested
            )
        }
        OutputStrategy::VirtualThenExisting => format!(
            "Could not create/find MIDI output port.\nRequested: '{}'\nAvailable outputs: {:?}",
            requested, available
        ),
    }
}
