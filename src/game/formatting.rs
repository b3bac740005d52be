//! Fixed-width text tables and mission blurbs
//!
//! Pure string builders shared by the interpreter and the TUI side panels.

use super::command::REGISTRY;
use crate::data::*;

pub const SCAN_HEADER: &str = "PORT     STATE     SERVICE   INFO";
pub const PROXY_HEADER: &str = "ID         LABEL        ANON   HEAT   COST";

/// Port table shown when a scan completes
pub fn scan_table(host: &Host) -> Vec<String> {
    let mut rows = vec![SCAN_HEADER.to_string()];
    rows.extend(host.services.iter().map(|service| {
        format!(
            "{:<8}{:<10}{:<10}{}",
            service.port,
            service.state(),
            service.name,
            service.info()
        )
    }));
    rows
}

pub fn proxy_table(proxies: &[ProxyNode]) -> Vec<String> {
    let mut rows = vec![PROXY_HEADER.to_string()];
    rows.extend(proxies.iter().map(|proxy| {
        format!(
            "{:<10}{:<12}{:<7}{:<7}{}",
            proxy.id,
            proxy.label,
            format!("{:.2}", proxy.anonymity),
            format!("{:.1}", proxy.heat),
            proxy.cost_per_use
        )
    }));
    rows
}

/// One-line inbox entry: `id | title | cash / rep | status`
pub fn mission_summary_line(mission: &MissionSummary) -> String {
    format!(
        "{} | {} | {}c / {}r | {}",
        mission.id, mission.title, mission.reward.cash, mission.reward.reputation, mission.status
    )
}

pub fn mission_detail(mission: &MissionSummary) -> Vec<String> {
    vec![
        mission.title.clone(),
        mission.description.clone(),
        format!(
            "Reward: {} credits, {} rep",
            mission.reward.cash, mission.reward.reputation
        ),
        format!("Deadline: {}", mission.deadline.format("%Y-%m-%d %H:%M UTC")),
    ]
}

pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["Available commands:".to_string()];
    lines.extend(
        REGISTRY
            .iter()
            .map(|spec| format!("{:<24} {}", spec.syntax, spec.description)),
    );
    lines
}

pub fn tool_line(tool: &ToolInstance) -> String {
    format!("{} (lvl {}) - {}", tool.label, tool.level, tool.description)
}

pub fn inventory_line(item: &InventoryItem) -> String {
    format!("{} | {} | {}:{}", item.id, item.label, item.source, item.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::worldgen::generate_world;
    use chrono::Utc;

    #[test]
    fn scan_table_pads_columns() {
        let world = generate_world(Utc::now());
        let rows = scan_table(world.host("hq-node").unwrap());
        assert_eq!(rows[0], SCAN_HEADER);
        assert_eq!(rows[1], "22      filtered  ssh       OpenSSH 8.5");
        assert_eq!(rows[2], "80      filtered  http      nginx/1.24");
        assert_eq!(rows[3], "443     closed    https     nginx/1.24 TLS");
    }

    #[test]
    fn proxy_table_rows() {
        let world = generate_world(Utc::now());
        let rows = proxy_table(&world.proxies);
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[1], "proxy-1   Atlas-1     0.60   0.0    8");
    }

    #[test]
    fn summary_line_format() {
        let world = generate_world(Utc::now());
        let missions = crate::game::missions::generate_missions(&world, Utc::now());
        assert_eq!(
            mission_summary_line(&missions[0].summary()),
            "mission-ghost | Ghost in the Archive | 2200c / 20r | available"
        );
    }

    #[test]
    fn help_has_header_and_padded_rows() {
        let lines = help_lines();
        assert_eq!(lines[0], "Available commands:");
        assert_eq!(lines[1], format!("{:<24} {}", "help", "Show the available commands"));
        assert_eq!(lines.len(), REGISTRY.len() + 1);
    }
}
