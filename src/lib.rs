pub mod bridge;
pub mod cli;
pub mod config;
pub mod connection;
pub mod logging;
pub mod midi;
pub mod protocol;
pub mod serial;
pub mod stop;

pub use bridge::{Bridge, BridgeSettings, BridgeStats};
pub use cli::Args;
pub use connection::{ConnectionManager, ConnectionSettings, ConnectionState};
pub use stop::StopToken;
