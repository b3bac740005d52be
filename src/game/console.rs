//! The live terminal session
//!
//! `Console` owns the current `GameState` and everything around it that the
//! reducer does not: transcript, command history, pending staged output, the
//! last signal and the save provider. Every mutation takes `&mut self`, so a
//! command and a decay tick can never interleave.

use super::announce::{Announcement, ExecutionPhase};
use super::interpreter::{self, Signal};
use super::{trace, GameState};
use crate::config::GameConfig;
use crate::data::{Id, Line, LineKind};
use crate::save::SaveProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

pub const PROMPT: &str = "lnk>";

const WELCOME: [&str; 10] = [
    "╔═══════════════════════════════════════════════════════╗",
    "║               Link26 :: Terminal v2026.1               ║",
    "║         A sentimental road back to Uplink times        ║",
    "╚═══════════════════════════════════════════════════════╝",
    "",
    "Welcome back, operator. The network awaits.",
    "Your mission inbox contains 3 contracts.",
    "",
    "Type 'inbox' to view missions. Type 'help' for commands.",
    "",
];

/// A transcript entry with a stable id for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalLine {
    pub id: Id,
    pub kind: LineKind,
    pub text: String,
}

impl From<Line> for TerminalLine {
    fn from(line: Line) -> Self {
        Self {
            id: Id::new(),
            kind: line.kind,
            text: line.text,
        }
    }
}

/// What happened to a submitted line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    Busy,   // Staged output from the previous command is still playing
}

pub struct Console {
    state: GameState,
    transcript: Vec<TerminalLine>,
    history: Vec<String>,
    signal: Option<Signal>,
    pending: VecDeque<Announcement>,
    since_submit: Duration,
    provider: Box<dyn SaveProvider>,
    history_limit: usize,
    transcript_limit: usize,
}

impl Console {
    pub fn new(provider: Box<dyn SaveProvider>, config: &GameConfig, now: DateTime<Utc>) -> Self {
        let mut console = Self {
            state: GameState::new(now),
            transcript: Vec::new(),
            history: Vec::new(),
            signal: None,
            pending: VecDeque::new(),
            since_submit: Duration::ZERO,
            provider,
            history_limit: config.history_limit.max(1),
            transcript_limit: config.transcript_limit.max(1),
        };
        console.push_welcome();
        console
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn transcript(&self) -> &[TerminalLine] {
        &self.transcript
    }

    /// Most recent first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Phase of the next staged line still waiting to print
    pub fn next_phase(&self) -> Option<ExecutionPhase> {
        self.pending.front().map(|a| a.phase)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Submission {
        if self.is_busy() {
            tracing::debug!(target: "link26::console", input, "input rejected while busy");
            return Submission::Busy;
        }

        let trimmed = input.trim();
        let outcome = interpreter::run(&self.state, trimmed, now);

        if outcome.clear {
            self.transcript.clear();
        }
        self.push(Line::new(LineKind::Command, format!("{} {}", PROMPT, trimmed)));
        for line in outcome.lines {
            self.push(line);
        }

        let mut announcements = outcome.announcements;
        announcements.sort_by_key(|a| a.offset_ms);
        self.pending = announcements.into();
        self.since_submit = Duration::ZERO;

        if !trimmed.is_empty() {
            self.history.retain(|entry| entry != trimmed);
            self.history.insert(0, trimmed.to_string());
            self.history.truncate(self.history_limit);
        }

        let mut signal = outcome.signal;
        if let Some(vfx) = signal.vfx.as_mut() {
            vfx.value = Some(trimmed.to_string());
        }
        self.signal = Some(signal);

        self.state = outcome.state;
        self.persist();
        Submission::Accepted
    }

    /// Release staged lines whose offset has passed. Returns how many were released.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        self.since_submit += elapsed;
        let now_ms = self.since_submit.as_millis() as u64;

        let mut released = 0;
        while self.pending.front().is_some_and(|a| a.offset_ms <= now_ms) {
            if let Some(announcement) = self.pending.pop_front() {
                self.push(announcement.line);
                released += 1;
            }
        }
        released
    }

    /// Periodic cool-down. Does nothing while a host is connected.
    pub fn decay_tick(&mut self) -> bool {
        if self.state.is_connected() {
            return false;
        }
        self.state.trace = trace::decay(&self.state.trace);
        true
    }

    /// The last command's signal, handed out once
    pub fn take_signal(&mut self) -> Option<Signal> {
        self.signal.take()
    }

    /// Swap in the saved snapshot, if the provider has one
    pub fn load_saved(&mut self) -> bool {
        match self.provider.load() {
            Ok(Some(state)) => {
                tracing::info!(target: "link26::save", provider = self.provider.name(), "save.restored");
                self.state = state;
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(target: "link26::save", error = %err, "save.load_failed");
                false
            }
        }
    }

    /// Wipe the save and start over with a fresh world
    pub fn reset_world(&mut self, now: DateTime<Utc>) {
        if let Err(err) = self.provider.clear() {
            tracing::warn!(target: "link26::save", error = %err, "save.clear_failed");
        }
        self.state = GameState::new(now);
        self.transcript.clear();
        self.history.clear();
        self.signal = None;
        self.pending.clear();
        self.since_submit = Duration::ZERO;
        self.push_welcome();
        tracing::info!(target: "link26::console", "world reset");
    }

    fn persist(&self) {
        if let Err(err) = self.provider.save(&self.state) {
            tracing::warn!(target: "link26::save", error = %err, "save.write_failed");
        }
    }

    fn push(&mut self, line: Line) {
        self.transcript.push(line.into());
        if self.transcript.len() > self.transcript_limit {
            let excess = self.transcript.len() - self.transcript_limit;
            self.transcript.drain(..excess);
        }
    }

    fn push_welcome(&mut self) {
        for text in WELCOME {
            self.push(Line::info(text));
        }
    }
}
