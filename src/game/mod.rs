//! Core game logic and state management
//!
//! `GameState` is the aggregate root and the unit of persistence. Everything
//! that changes it goes through [`interpreter::reduce`]; the [`console::Console`]
//! owns the live copy and feeds it input.

pub mod announce;
pub mod command;
pub mod console;
pub mod formatting;
pub mod interpreter;
pub mod missions;
pub mod route;
pub mod trace;
pub mod worldgen;

use crate::data::*;
use chrono::{DateTime, Utc};
use route::RouteState;
use serde::{Deserialize, Serialize};
use trace::TraceInfo;

pub const STARTING_CASH: i64 = 4200;
pub const STARTING_REPUTATION: i64 = 36;
pub const STARTING_TRACE: f64 = 8.0;

/// The whole simulation at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub time: DateTime<Utc>,
    pub cash: i64,
    pub reputation: i64,
    pub trace: TraceInfo,
    pub route: RouteState,
    pub tools: Vec<ToolInstance>,
    pub inbox: Vec<MissionSummary>,
    pub missions: Vec<Mission>,
    pub world: World,
    pub session: SessionState,
    pub inventory: Vec<InventoryItem>,
}

impl GameState {
    /// Fresh world, fresh missions, starting balance
    pub fn new(now: DateTime<Utc>) -> Self {
        let world = worldgen::generate_world(now);
        let missions = missions::generate_missions(&world, now);
        let inbox = missions::inbox_for(&missions);

        Self {
            time: now,
            cash: STARTING_CASH,
            reputation: STARTING_REPUTATION,
            trace: TraceInfo::new(STARTING_TRACE, "Session initialized"),
            route: RouteState::default(),
            tools: starter_loadout(),
            inbox,
            missions,
            world,
            session: SessionState::default(),
            inventory: Vec::new(),
        }
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Change a mission's status and mirror it into the inbox
    pub fn set_mission_status(&mut self, id: &str, status: MissionStatus) -> bool {
        let Some(mission) = self.missions.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        mission.status = status;
        if let Some(summary) = self.inbox.iter_mut().find(|s| s.id == id) {
            summary.status = status;
        }
        true
    }

    pub fn active_missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter().filter(|m| m.status == MissionStatus::Accepted)
    }

    pub fn connected_host(&self) -> Option<&Host> {
        self.session
            .connected_host
            .as_deref()
            .and_then(|id| self.world.host(id))
    }

    pub fn is_connected(&self) -> bool {
        self.session.connected_host.is_some()
    }

    /// Ids for inventory items are sequential, so snapshots stay stable
    pub fn next_inventory_id(&self) -> String {
        format!("inv-{:03}", self.inventory.len() + 1)
    }
}
