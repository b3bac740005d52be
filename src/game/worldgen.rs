//! Deterministic world map: ten hosts, fifteen proxies, fixed real-world coordinates

use crate::data::*;
use chrono::{DateTime, Duration, Utc};

struct HostTemplate {
    id: &'static str,
    label: &'static str,
    region: &'static str,
    lat: f64,
    lon: f64,
}

const HOSTS: [HostTemplate; 10] = [
    HostTemplate { id: "hq-node", label: "Nova Satellite HQ", region: "North America", lat: 40.7, lon: -74.0 },
    HostTemplate { id: "orbital", label: "Orbital Data Exchange", region: "Europe", lat: 51.5, lon: -0.1 },
    HostTemplate { id: "aurora", label: "Aurora Bioware Labs", region: "Asia", lat: 35.7, lon: 139.7 },
    HostTemplate { id: "charon", label: "Charon Defense Grid", region: "Africa", lat: -26.2, lon: 28.0 },
    HostTemplate { id: "iris", label: "Iris Cloud Archive", region: "Oceania", lat: -33.9, lon: 151.2 },
    HostTemplate { id: "helix", label: "Helix Genomics", region: "South America", lat: -23.5, lon: -46.6 },
    HostTemplate { id: "polaris", label: "Polaris Financial Mesh", region: "Middle East", lat: 25.2, lon: 55.3 },
    HostTemplate { id: "solstice", label: "Solstice Power Grid", region: "Scandinavia", lat: 59.3, lon: 18.1 },
    HostTemplate { id: "mosaic", label: "Mosaic Media Nest", region: "Central Europe", lat: 48.2, lon: 16.4 },
    HostTemplate { id: "axion", label: "Axion Research Cluster", region: "Pacific", lat: 21.3, lon: -157.8 },
];

const PROXY_NAMES: [&str; 15] = [
    "Atlas", "Nebula", "Ghost", "Circuit", "Phantom", "Fuse", "Pulse", "Boreal",
    "Tidal", "Beacon", "Harbor", "Echo", "Lumen", "Shard", "Nova",
];

// Proxies sit in different cities from every host
const PROXY_LOCATIONS: [(f64, f64); 15] = [
    (45.5, -73.6),   // Montreal
    (34.1, -118.2),  // Los Angeles
    (41.9, -87.6),   // Chicago
    (50.1, 8.7),     // Frankfurt
    (52.4, 4.9),     // Amsterdam
    (55.8, 37.6),    // Moscow
    (39.9, 116.4),   // Beijing
    (31.2, 121.5),   // Shanghai
    (37.6, 127.0),   // Seoul
    (1.3, 103.8),    // Singapore
    (22.3, 114.2),   // Hong Kong
    (28.6, 77.2),    // Delhi
    (19.1, 72.9),    // Mumbai
    (-34.6, -58.4),  // Buenos Aires
    (30.0, 31.2),    // Cairo
];

fn creds() -> AccessRules {
    AccessRules { requires_creds: true, multi_factor: false }
}

fn mfa() -> AccessRules {
    AccessRules { requires_creds: false, multi_factor: true }
}

/// The three rotating service layouts
fn service_roster(slot: usize) -> Vec<Service> {
    match slot % 3 {
        0 => vec![
            Service::tcp(22, "ssh", "OpenSSH 8.5", 0.4, creds()),
            Service::tcp(80, "http", "nginx/1.24", 0.5, AccessRules::default()),
            Service::tcp(443, "https", "nginx/1.24 TLS", 0.3, mfa()),
        ],
        1 => vec![
            Service::tcp(3306, "db", "MariaDB 10.7", 0.6, creds()),
            Service::tcp(25, "mail", "Postfix 3.6", 0.2, AccessRules::default()),
            Service::tcp(8080, "http", "Kestrel", 0.3, mfa()),
        ],
        _ => vec![
            Service::tcp(22, "ssh", "OpenSSH 9.0", 0.4, creds()),
            Service::tcp(443, "https", "Caddy 2", 0.3, AccessRules::default()),
            Service::tcp(9090, "http", "FastAPI", 0.35, AccessRules::default()),
        ],
    }
}

fn seed_filesystem(host_id: &str) -> Vec<FsEntry> {
    let mut fs = vec![
        FsEntry::file("/secrets.txt", "TOP SECRET: Prototype diagnostics"),
        FsEntry::file("/payload.bin", "[binary blob]"),
        FsEntry::dir("/logs"),
        FsEntry::file("/data/vault.txt", "Ledger entries: 42"),
    ];
    if host_id == "orbital" {
        fs.push(FsEntry::file("/logs/manifest.log", "launch window T-00:00 nominal"));
    }
    fs
}

fn seed_logs(label: &str, now: DateTime<Utc>) -> Vec<LogEntry> {
    (0..3)
        .map(|index| LogEntry {
            timestamp: now - Duration::minutes(index),
            level: if index == 2 { LogLevel::Warning } else { LogLevel::Info },
            message: format!("{} audit record {}", label, index),
        })
        .collect()
}

pub fn generate_world(now: DateTime<Utc>) -> World {
    let hosts = HOSTS
        .iter()
        .enumerate()
        .map(|(index, t)| Host {
            id: t.id.to_string(),
            label: t.label.to_string(),
            geo: GeoPoint::new(t.lat, t.lon, t.region),
            monitoring: 0.15 + (index % 3) as f64 * 0.2,
            services: service_roster(index),
            filesystem: seed_filesystem(t.id),
            logs: seed_logs(t.label, now),
            flags: HostFlags {
                honeypot: index == 3,
                rate_limited: index % 4 == 0,
            },
        })
        .collect();

    let proxies = PROXY_NAMES
        .iter()
        .zip(PROXY_LOCATIONS.iter())
        .enumerate()
        .map(|(index, (name, &(lat, lon)))| ProxyNode {
            id: format!("proxy-{}", index + 1),
            label: format!("{}-{}", name, index + 1),
            geo: GeoPoint::new(lat, lon, "global"),
            stability: 0.5 + (index % 5) as f64 * 0.1,
            anonymity: 0.3 + ((index + 2) % 4) as f64 * 0.15,
            heat: 0.0,
            cost_per_use: 8 + (index % 5) as u32 * 5,
        })
        .collect();

    World { hosts, proxies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roster_sizes_and_unique_ids() {
        let world = generate_world(Utc::now());
        assert_eq!(world.hosts.len(), 10);
        assert_eq!(world.proxies.len(), 15);
        let host_ids: HashSet<_> = world.hosts.iter().map(|h| &h.id).collect();
        let proxy_ids: HashSet<_> = world.proxies.iter().map(|p| &p.id).collect();
        assert_eq!(host_ids.len(), 10);
        assert_eq!(proxy_ids.len(), 15);
    }

    #[test]
    fn every_entity_has_its_own_location() {
        let world = generate_world(Utc::now());
        let mut seen = HashSet::new();
        for geo in world.hosts.iter().map(|h| &h.geo).chain(world.proxies.iter().map(|p| &p.geo)) {
            assert!(seen.insert(format!("{:.1},{:.1}", geo.lat, geo.lon)));
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let now = Utc::now();
        assert_eq!(generate_world(now), generate_world(now));
    }

    #[test]
    fn template_attributes() {
        let world = generate_world(Utc::now());
        let hq = world.host("hq-node").unwrap();
        assert!((hq.monitoring - 0.15).abs() < 1e-9);
        assert!(hq.flags.rate_limited);
        assert!(world.host("charon").unwrap().flags.honeypot);
        assert_eq!(world.host("orbital").unwrap().services[0].port, 3306);

        let p1 = world.proxy("proxy-1").unwrap();
        assert_eq!(p1.label, "Atlas-1");
        assert_eq!(p1.cost_per_use, 8);
        assert_eq!(p1.heat, 0.0);
        assert_eq!(world.proxy("proxy-15").unwrap().label, "Nova-15");
    }

    #[test]
    fn orbital_carries_the_manifest() {
        let world = generate_world(Utc::now());
        assert!(world.host("orbital").unwrap().entry("/logs/manifest.log").is_some());
        assert!(world.host("hq-node").unwrap().entry("/logs/manifest.log").is_none());
    }

    #[test]
    fn third_log_record_is_a_warning() {
        let world = generate_world(Utc::now());
        let logs = &world.host("iris").unwrap().logs;
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[2].level, LogLevel::Warning);
        assert_eq!(logs[0].message, "Iris Cloud Archive audit record 0");
    }
}
