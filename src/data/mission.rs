//! Contracts offered through the inbox

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Available,
    Accepted,
    Completed,
    Failed,
}

impl std::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionStatus::Available => write!(f, "available"),
            MissionStatus::Accepted => write!(f, "accepted"),
            MissionStatus::Completed => write!(f, "completed"),
            MissionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// What the contract asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    Exfil,   // Copy the target file to @local
    Modify,  // Tamper with the target file in place
    Plant,   // Leave a tracer marker in the target file
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionObjective {
    pub kind: ObjectiveKind,
    pub host_id: String,
    pub target_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionReward {
    pub cash: i64,
    pub reputation: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub objective: MissionObjective,
    pub reward: MissionReward,
    pub deadline: DateTime<Utc>,
    pub status: MissionStatus,
}

impl Mission {
    pub fn summary(&self) -> MissionSummary {
        MissionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            reward: self.reward,
            target_host: self.objective.host_id.clone(),
            deadline: self.deadline,
            status: self.status,
        }
    }
}

/// The subset of a mission shown in the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: MissionReward,
    pub target_host: String,
    pub deadline: DateTime<Utc>,
    pub status: MissionStatus,
}
