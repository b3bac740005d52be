//! Detection meter: noise accumulation, idle decay and status tiers

use super::route::RouteState;
use crate::data::Host;
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: f64 = 100.0;

/// Monitoring assumed when noise is not tied to a host
const UNKNOWN_HOST_MONITORING: f64 = 0.2;
const MONITORING_FLOOR: f64 = 0.15;
const DIRECT_ROUTE_PENALTY: f64 = 1.5;
const ANONYMITY_DAMPING: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraceStatus {
    #[serde(rename = "CALM")]
    Calm,
    #[serde(rename = "ALERT")]
    Alert,
    #[serde(rename = "HUNT")]
    Hunt,
    #[serde(rename = "LOCKDOWN")]
    Lockdown,
}

impl TraceStatus {
    /// Exact step function over 25/50/80, no hysteresis
    pub fn from_level(level: f64) -> Self {
        match level {
            l if l >= 80.0 => TraceStatus::Lockdown,
            l if l >= 50.0 => TraceStatus::Hunt,
            l if l >= 25.0 => TraceStatus::Alert,
            _ => TraceStatus::Calm,
        }
    }
}

impl std::fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceStatus::Calm => write!(f, "CALM"),
            TraceStatus::Alert => write!(f, "ALERT"),
            TraceStatus::Hunt => write!(f, "HUNT"),
            TraceStatus::Lockdown => write!(f, "LOCKDOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceInfo {
    pub level: f64,
    pub status: TraceStatus,
    pub last_event: Option<String>,
}

impl TraceInfo {
    pub fn new(level: f64, last_event: &str) -> Self {
        let level = clamp_level(level);
        Self {
            level,
            status: TraceStatus::from_level(level),
            last_event: Some(last_event.to_string()),
        }
    }
}

pub fn clamp_level(level: f64) -> f64 {
    level.clamp(0.0, MAX_LEVEL)
}

/// Noise that actually reaches the meter once route and host are accounted for
pub fn effective_noise(base: f64, route: &RouteState, host: Option<&Host>) -> f64 {
    let monitoring = host.map_or(UNKNOWN_HOST_MONITORING, |h| h.monitoring);
    let penalty = if route.anonymity == 0.0 { DIRECT_ROUTE_PENALTY } else { 1.0 };
    base * (1.0 - route.anonymity * ANONYMITY_DAMPING) * monitoring.max(MONITORING_FLOOR) * penalty
}

pub fn add_noise(trace: &TraceInfo, base: f64, route: &RouteState, host: Option<&Host>) -> TraceInfo {
    let noise = effective_noise(base, route, host);
    let level = clamp_level(trace.level + noise);
    TraceInfo {
        level,
        status: TraceStatus::from_level(level),
        last_event: Some(format!("Noise +{:.1}", noise)),
    }
}

/// Idle cool-down. Hotter traces fall faster.
pub fn decay(trace: &TraceInfo) -> TraceInfo {
    let rate = if trace.level > 50.0 {
        1.2
    } else if trace.level > 25.0 {
        0.8
    } else {
        0.4
    };
    let level = clamp_level(trace.level - rate);
    TraceInfo {
        level,
        status: TraceStatus::from_level(level),
        last_event: trace.last_event.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::worldgen::generate_world;

    fn direct() -> RouteState {
        RouteState::default()
    }

    #[test]
    fn status_thresholds_are_exact() {
        assert_eq!(TraceStatus::from_level(0.0), TraceStatus::Calm);
        assert_eq!(TraceStatus::from_level(24.999), TraceStatus::Calm);
        assert_eq!(TraceStatus::from_level(25.0), TraceStatus::Alert);
        assert_eq!(TraceStatus::from_level(49.9), TraceStatus::Alert);
        assert_eq!(TraceStatus::from_level(50.0), TraceStatus::Hunt);
        assert_eq!(TraceStatus::from_level(79.9), TraceStatus::Hunt);
        assert_eq!(TraceStatus::from_level(80.0), TraceStatus::Lockdown);
        assert_eq!(TraceStatus::from_level(100.0), TraceStatus::Lockdown);
    }

    #[test]
    fn direct_route_amplifies_noise() {
        let world = generate_world(chrono::Utc::now());
        let hq = world.host("hq-node").unwrap();
        let trace = TraceInfo::new(8.0, "Session initialized");
        let next = add_noise(&trace, 12.0, &direct(), Some(hq));
        // 12 * 1 * 0.15 * 1.5
        assert!((next.level - (8.0 + 2.7)).abs() < 1e-9);
        assert_eq!(next.last_event.as_deref(), Some("Noise +2.7"));
    }

    #[test]
    fn anonymous_route_dampens_noise() {
        let route = RouteState { hops: vec!["proxy-1".into()], latency_ms: 38, anonymity: 0.5 };
        let noise = effective_noise(10.0, &route, None);
        // 10 * (1 - 0.35) * 0.2
        assert!((noise - 1.3).abs() < 1e-9);
    }

    #[test]
    fn low_monitoring_is_floored() {
        let world = generate_world(chrono::Utc::now());
        let mut host = world.host("aurora").unwrap().clone();
        host.monitoring = 0.01;
        let noise = effective_noise(10.0, &direct(), Some(&host));
        assert!((noise - 10.0 * 0.15 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn noise_clamps_at_hundred() {
        let trace = TraceInfo::new(95.0, "x");
        let next = add_noise(&trace, 1000.0, &direct(), None);
        assert_eq!(next.level, 100.0);
        assert_eq!(next.status, TraceStatus::Lockdown);
    }

    #[test]
    fn decay_rate_depends_on_level() {
        let hot = decay(&TraceInfo::new(60.0, "x"));
        assert!((hot.level - 58.8).abs() < 1e-9);
        let warm = decay(&TraceInfo::new(30.0, "x"));
        assert!((warm.level - 29.2).abs() < 1e-9);
        let cold = decay(&TraceInfo::new(0.2, "x"));
        assert_eq!(cold.level, 0.0);
    }

    #[test]
    fn decay_keeps_last_event() {
        let trace = TraceInfo::new(30.0, "Noise +4.0");
        assert_eq!(decay(&trace).last_event.as_deref(), Some("Noise +4.0"));
    }

    #[test]
    fn decay_can_drop_a_tier() {
        let next = decay(&TraceInfo::new(26.0, "x"));
        assert_eq!(next.status, TraceStatus::Alert);
        let next = decay(&next);
        assert_eq!(next.status, TraceStatus::Calm);
    }
}
