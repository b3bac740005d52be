//! Data structures for the game world
//!
//! Defines hosts, proxies, missions, the player's loadout and the session.

pub mod mission;
pub mod player;
pub mod session;
pub mod world;

pub use mission::*;
pub use player::*;
pub use session::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a terminal output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Info,
    Command,
    Error,
    Success,
    Warning,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Info => write!(f, "INFO"),
            LineKind::Command => write!(f, "CMD"),
            LineKind::Error => write!(f, "ERROR"),
            LineKind::Success => write!(f, "OK"),
            LineKind::Warning => write!(f, "WARN"),
        }
    }
}

/// A single line of reducer output, before it lands in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LineKind::Info, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LineKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LineKind::Warning, text)
    }
}

/// Real-world location of a host or proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub region: String,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64, region: &str) -> Self {
        Self { lat, lon, region: region.to_string() }
    }
}

/// A unique identifier wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(pub Uuid);

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}
