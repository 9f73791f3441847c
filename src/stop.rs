//! Cooperative shutdown shared between the signal handler and the bridge loop.

use crossbeam::channel::{bounded, Receiver, Sender};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cloneable stop flag.
///
/// The flag is the only value shared across threads. The channel only wakes
/// a loop sleeping in [`StopToken::wait`].
#[derive(Debug, Clone)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for StopToken {
    fn default() -> Self {
        Self::new()
    }
}

impl StopToken {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        StopToken {
            flag: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleeps for up to `timeout`, returning early once stopped.
    ///
    /// Returns whether the token is stopped.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_stopped() {
            return true;
        }
        let _ = self.wake_rx.recv_timeout(timeout);
        self.is_stopped()
    }
}

/// Stops `token` on SIGINT or SIGTERM (Ctrl+C or Ctrl+Break on Windows).
pub fn install_signal_handler(token: &StopToken) -> Result<(), ctrlc::Error> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        info!("Stop requested");
        token.stop();
    })
}
