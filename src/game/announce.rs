//! Staged output for multi-step commands
//!
//! `scan` and `connect` print their first lines immediately and the rest
//! over the following second or so. The reducer has already applied the
//! state change by then; announcements only carry text.

use crate::data::Line;
use serde::{Deserialize, Serialize};

/// Which stage of a staged command a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPhase {
    Enumerate,
    Fingerprint,
    Complete,
    Warning,
    Handshake,
    Established,
}

impl ExecutionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionPhase::Enumerate => "enumerate",
            ExecutionPhase::Fingerprint => "fingerprint",
            ExecutionPhase::Complete => "complete",
            ExecutionPhase::Warning => "warning",
            ExecutionPhase::Handshake => "handshake",
            ExecutionPhase::Established => "established",
        }
    }
}

/// A line scheduled `offset_ms` after the command was submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub offset_ms: u64,
    pub phase: ExecutionPhase,
    pub line: Line,
}

impl Announcement {
    pub fn new(offset_ms: u64, phase: ExecutionPhase, line: Line) -> Self {
        Self { offset_ms, phase, line }
    }

    /// Same offset and phase for a block of lines, e.g. a scan table
    pub fn batch(offset_ms: u64, phase: ExecutionPhase, lines: Vec<Line>) -> Vec<Self> {
        lines
            .into_iter()
            .map(|line| Self::new(offset_ms, phase, line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_shares_offset_and_phase() {
        let lines = vec![Line::info("a"), Line::info("b")];
        let batch = Announcement::batch(1200, ExecutionPhase::Complete, lines);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|a| a.offset_ms == 1200 && a.phase == ExecutionPhase::Complete));
        assert_eq!(batch[0].phase.name(), "complete");
    }
}
