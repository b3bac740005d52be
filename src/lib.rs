//! Link26 :: Terminal
//!
//! A sentimental road back to Uplink times: a single-player hacking sim
//! played entirely through a fake terminal. Scan hosts, chain proxies,
//! break in, grab files and cash in contracts while keeping the trace low.
//!
//! # Game Mechanics
//!
//! - **Routes**: Proxy chains buy anonymity at the cost of latency, and every use heats a proxy up
//! - **Trace**: Noisy commands raise detection; idle time lets it cool off
//! - **Missions**: Exfil, modify and plant contracts pay cash and reputation
//!
//! # Architecture
//!
//! - `data` - World, mission, loadout and session types
//! - `game` - World generation, the command reducer and the live console
//! - `save` - Snapshot persistence behind a provider trait
//! - `config` - JSON configuration with defaults
//! - `tui` - Terminal user interface with ratatui

pub mod config;
pub mod data;
pub mod game;
pub mod save;
pub mod tui;

pub use data::*;
pub use game::console::Console;
pub use game::GameState;

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Startup failures surfaced to the binary
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Terminal setup failed: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Cannot open log file {path:?}: {source}")]
    LogFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn startup_errors_name_their_cause() {
        let err = GameError::LogFile {
            path: "/nope/link26.log".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), r#"Cannot open log file "/nope/link26.log": denied"#);

        let err = GameError::Terminal(io::Error::new(io::ErrorKind::Other, "no tty"));
        assert_eq!(err.to_string(), "Terminal setup failed: no tty");
        assert!(std::error::Error::source(&err).is_some());
    }
}
