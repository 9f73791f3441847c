//! The bridge loop: serial lines in, MIDI messages out.

use crate::connection::{ConnectionManager, ReadOutcome, Readiness};
use crate::midi::MidiSink;
use crate::protocol::{decode, Decoded};
use crate::serial::SerialBackend;
use crate::stop::StopToken;
use chrono::{DateTime, Local};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Process-lifetime throughput counters
#[derive(Debug, Clone)]
pub struct BridgeStats {
    pub sent: u64,
    pub info_lines: u64,
    pub started: DateTime<Local>,
    last_report: Instant,
}

impl Default for BridgeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStats {
    pub fn new() -> Self {
        BridgeStats {
            sent: 0,
            info_lines: 0,
            started: Local::now(),
            last_report: Instant::now(),
        }
    }

    pub fn report_due(&self, now: Instant, interval: Duration) -> bool {
        now.duration_since(self.last_report) >= interval
    }

    pub fn mark_reported(&mut self, now: Instant) {
        self.last_report = now;
    }
}

#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub retry_interval: Duration,
    pub report_interval: Duration,
}

pub struct Bridge<B: SerialBackend, S: MidiSink> {
    connection: ConnectionManager<B>,
    sink: S,
    stop: StopToken,
    settings: BridgeSettings,
    stats: BridgeStats,
}

impl<B: SerialBackend, S: MidiSink> Bridge<B, S> {
    pub fn new(
        connection: ConnectionManager<B>,
        sink: S,
        stop: StopToken,
        settings: BridgeSettings,
    ) -> Self {
        Bridge {
            connection,
            sink,
            stop,
            settings,
            stats: BridgeStats::new(),
        }
    }

    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// Runs until the stop token fires, then releases both ports.
    pub fn run(mut self) -> BridgeStats {
        while !self.stop.is_stopped() {
            if self.connection.ensure_connected() == Readiness::Wait {
                self.stop.wait(self.settings.retry_interval);
                continue;
            }

            match self.connection.read() {
                ReadOutcome::Line(line) => self.handle_line(&line),
                ReadOutcome::Idle => {}
                ReadOutcome::Lost => {
                    self.stop.wait(self.settings.retry_interval);
                    continue;
                }
            }

            self.maybe_report();
        }

        info!("Stopping BECA Link...");
        self.connection.close();
        self.sink.close();
        self.stats
    }

    fn handle_line(&mut self, line: &str) {
        match decode(line) {
            Some(Decoded::Info(text)) => {
                self.stats.info_lines += 1;
                info!("[BECA] {}", text);
            }
            Some(Decoded::Midi(msg)) => match self.sink.send(&msg) {
                Ok(()) => self.stats.sent += 1,
                Err(e) => warn!("Failed to send {:?}: {}", msg, e),
            },
            None => {}
        }
    }

    fn maybe_report(&mut self) {
        let now = Instant::now();
        if self.stats.report_due(now, self.settings.report_interval) {
            info!(
                "Bridge running. Sent {} MIDI messages since {}.",
                self.stats.sent,
                self.stats.started.format("%H:%M:%S")
            );
            self.stats.mark_reported(now);
        }
    }
}
