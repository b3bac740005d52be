//! Proxy chains and their aggregate latency / anonymity

use crate::data::ProxyNode;
use serde::{Deserialize, Serialize};

/// Fixed per-hop overhead on top of a proxy's cost
pub const HOP_OVERHEAD_MS: u32 = 30;
/// Anonymity never reaches certainty, however long the chain
pub const MAX_ANONYMITY: f64 = 0.99;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteState {
    pub hops: Vec<String>,
    pub latency_ms: u32,
    pub anonymity: f64,
}

impl RouteState {
    pub fn contains(&self, proxy_id: &str) -> bool {
        self.hops.iter().any(|h| h == proxy_id)
    }

    pub fn is_direct(&self) -> bool {
        self.hops.is_empty()
    }

    /// Hop list as shown by `route show`
    pub fn describe(&self) -> String {
        if self.hops.is_empty() {
            "Direct".to_string()
        } else {
            self.hops.join(" -> ")
        }
    }
}

/// Recompute a route from scratch over the current proxy table.
///
/// Each hop is an independent chance of shaking off detection, so anonymities compose
/// as `1 - Π(1 - a)`. Ids missing from the table are kept in `hops` but contribute nothing.
pub fn build_route(hops: &[String], proxies: &[ProxyNode]) -> RouteState {
    let mut latency_ms = 0;
    let mut anonymity = 0.0_f64;
    for hop in hops {
        let Some(node) = proxies.iter().find(|p| &p.id == hop) else {
            continue;
        };
        latency_ms += HOP_OVERHEAD_MS + node.cost_per_use;
        anonymity = 1.0 - (1.0 - anonymity) * (1.0 - node.anonymity.clamp(0.0, 1.0));
    }
    RouteState {
        hops: hops.to_vec(),
        latency_ms,
        anonymity: anonymity.clamp(0.0, MAX_ANONYMITY),
    }
}
