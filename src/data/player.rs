//! Player loadout and captured loot

use serde::{Deserialize, Serialize};

/// Tool slots in the player's kit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolId {
    Scanner,
    ProxyChain,
    Wiper,
    Tracker,
}

impl ToolId {
    pub fn all() -> [ToolId; 4] {
        [ToolId::Scanner, ToolId::ProxyChain, ToolId::Wiper, ToolId::Tracker]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolId::Scanner => "ScanSuite Alpha",
            ToolId::ProxyChain => "Proxy Chain",
            ToolId::Wiper => "Logger Wiper",
            ToolId::Tracker => "Pulse Tracker",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolId::Scanner => "Base recon module.",
            ToolId::ProxyChain => "Sneaks traffic through proxy hops.",
            ToolId::Wiper => "Clears trace signatures (use sparingly).",
            ToolId::Tracker => "Tracks host changes.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInstance {
    pub id: ToolId,
    pub level: u8,
    pub label: String,
    pub description: String,
}

impl ToolInstance {
    pub fn starter(id: ToolId) -> Self {
        Self {
            id,
            level: 1,
            label: id.label().to_string(),
            description: id.description().to_string(),
        }
    }
}

/// Level-1 copies of every tool
pub fn starter_loadout() -> Vec<ToolInstance> {
    ToolId::all().into_iter().map(ToolInstance::starter).collect()
}

/// A file copied off a remote host with `cp <src> @local`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub label: String,
    pub source: String,          // Host id the file came from
    pub path: String,
    pub content: Option<String>,
}
