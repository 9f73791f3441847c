use simplelog::*;
use std::fs::{self, File, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;

/// Status lines go to stdout; a debug-level copy goes to
/// `~/.local/share/beca-link/logs/bridge.log` when the file can be opened.
pub fn init_logger(verbose: bool) -> Result<(), Error> {
    let terminal_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level,
        config.clone(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )];

    // The file log is optional; a detached or sandboxed process still runs.
    if let Ok(log_file) = open_log_file() {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, log_file));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| Error::new(ErrorKind::Other, format!("Logger initialization failed: {}", e)))
}

fn open_log_file() -> Result<File, Error> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    let log_dir = PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("beca-link")
        .join("logs");

    fs::create_dir_all(&log_dir)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("bridge.log"))
}
