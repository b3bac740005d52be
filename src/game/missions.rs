//! Mission catalog, objective checks and next-step guidance

use crate::data::*;
use chrono::{DateTime, Duration, Utc};

struct Blueprint {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    kind: ObjectiveKind,
    host_id: &'static str,
    target_path: &'static str,
    reward: MissionReward,
}

const BLUEPRINTS: [Blueprint; 3] = [
    Blueprint {
        id: "mission-ghost",
        title: "Ghost in the Archive",
        description: "Exfil the prototype diagnostics without triggering the IDS.",
        kind: ObjectiveKind::Exfil,
        host_id: "hq-node",
        target_path: "/secrets.txt",
        reward: MissionReward { cash: 2200, reputation: 20 },
    },
    Blueprint {
        id: "mission-orbital",
        title: "Orbital Whisper",
        description: "Modify the telemetry log so the orbital launch appears delayed.",
        kind: ObjectiveKind::Modify,
        host_id: "orbital",
        target_path: "/logs/manifest.log",
        reward: MissionReward { cash: 1800, reputation: 15 },
    },
    Blueprint {
        id: "mission-iris",
        title: "Iris Signal",
        description: "Plant a tracer file inside Iris' vault to track the next shipment.",
        kind: ObjectiveKind::Plant,
        host_id: "iris",
        target_path: "/data/vault.txt",
        reward: MissionReward { cash: 1600, reputation: 18 },
    },
];

/// Content markers that count as a completed modify objective
const MODIFY_MARKERS: [&str; 2] = ["tampered", "state patched"];
const PLANT_MARKER: &str = "tracer";

/// Build the fixed catalog for `world`. Deadlines land one hour apart from `now`.
pub fn generate_missions(world: &World, now: DateTime<Utc>) -> Vec<Mission> {
    BLUEPRINTS
        .iter()
        .enumerate()
        .filter(|(_, bp)| world.host(bp.host_id).is_some())
        .map(|(index, bp)| {
            let host = world.host(bp.host_id);
            let description = match host {
                Some(h) => format!("{} Target: {}", bp.description, h.label),
                None => bp.description.to_string(),
            };
            Mission {
                id: bp.id.to_string(),
                title: bp.title.to_string(),
                description,
                objective: MissionObjective {
                    kind: bp.kind,
                    host_id: bp.host_id.to_string(),
                    target_path: bp.target_path.to_string(),
                },
                reward: bp.reward,
                deadline: now + Duration::hours(index as i64 + 1),
                status: MissionStatus::Available,
            }
        })
        .collect()
}

pub fn inbox_for(missions: &[Mission]) -> Vec<MissionSummary> {
    missions.iter().map(Mission::summary).collect()
}

/// Whether the world and inventory currently satisfy the mission's objective
pub fn objective_met(objective: &MissionObjective, world: &World, inventory: &[InventoryItem]) -> bool {
    let Some(host) = world.host(&objective.host_id) else {
        return false;
    };
    match objective.kind {
        ObjectiveKind::Exfil => inventory
            .iter()
            .any(|item| item.source == objective.host_id && item.path == objective.target_path),
        ObjectiveKind::Modify => host
            .entry(&objective.target_path)
            .and_then(|e| e.content.as_deref())
            .map_or(false, |c| MODIFY_MARKERS.iter().any(|m| c.contains(m))),
        ObjectiveKind::Plant => host.filesystem.iter().any(|e| {
            e.path == objective.target_path
                && e.content.as_deref().map_or(false, |c| c.contains(PLANT_MARKER))
        }),
    }
}

/// Suggested next command for a mission in progress
pub fn next_step(
    mission: &Mission,
    session: &SessionState,
    has_route: bool,
    inventory: &[InventoryItem],
) -> Line {
    let objective = &mission.objective;
    let on_target = session.connected_host.as_deref() == Some(objective.host_id.as_str());

    if objective.kind == ObjectiveKind::Exfil {
        let captured = inventory
            .iter()
            .any(|item| item.source == objective.host_id && item.path == objective.target_path);
        if captured {
            return Line::success(format!("File captured! Submit mission with: submit {}", mission.id));
        }
    }

    if on_target {
        return Line::info(match objective.kind {
            ObjectiveKind::Exfil => format!("Find and copy target file: cp {} @local", objective.target_path),
            ObjectiveKind::Modify => format!("Edit target file: edit {} key=value", objective.target_path),
            ObjectiveKind::Plant => format!("Plant tracer in: {}", objective.target_path),
        });
    }

    if !has_route {
        return Line::warning(match objective.kind {
            ObjectiveKind::Exfil => "Build proxy route: route add proxy-1".to_string(),
            _ => "Build proxy route first".to_string(),
        });
    }

    Line::info(format!("Connect to target: connect {}", objective.host_id))
}
