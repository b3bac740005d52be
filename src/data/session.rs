//! Per-connection session state

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Host ids scanned during this session.
///
/// Serialized as a plain sorted list so snapshots stay order-independent; any list,
/// duplicates included, reads back into a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ScannedHosts(BTreeSet<String>);

impl ScannedHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host_id: &str) -> bool {
        self.0.insert(host_id.to_string())
    }

    pub fn contains(&self, host_id: &str) -> bool {
        self.0.contains(host_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ScannedHosts {
    fn from(list: Vec<String>) -> Self {
        Self(list.into_iter().collect())
    }
}

impl From<ScannedHosts> for Vec<String> {
    fn from(set: ScannedHosts) -> Self {
        set.0.into_iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub connected_host: Option<String>,
    pub working_dir: Option<String>,
    pub current_target: Option<String>,  // UI focus: last scanned or connected host
    #[serde(default)]
    pub scanned_hosts: ScannedHosts,
}

impl SessionState {
    pub fn working_dir(&self) -> &str {
        self.working_dir.as_deref().unwrap_or("/")
    }

    /// Drop the connection, keeping what was learned by scanning
    pub fn disconnected(&self) -> Self {
        Self {
            scanned_hosts: self.scanned_hosts.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanned_hosts_serialize_as_sorted_list() {
        let mut set = ScannedHosts::new();
        set.insert("orbital");
        set.insert("hq-node");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["hq-node","orbital"]"#);
    }

    #[test]
    fn duplicate_list_entries_collapse_on_load() {
        let set: ScannedHosts = serde_json::from_str(r#"["iris","iris","aurora"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("iris"));
    }

    #[test]
    fn missing_scanned_hosts_defaults_to_empty() {
        let session: SessionState = serde_json::from_str(r#"{"connected_host":null,"working_dir":null,"current_target":null}"#).unwrap();
        assert!(session.scanned_hosts.is_empty());
    }

    #[test]
    fn disconnect_keeps_scanned_hosts() {
        let mut session = SessionState {
            connected_host: Some("hq-node".into()),
            working_dir: Some("/data".into()),
            current_target: Some("hq-node".into()),
            scanned_hosts: ScannedHosts::new(),
        };
        session.scanned_hosts.insert("hq-node");
        let next = session.disconnected();
        assert_eq!(next.connected_host, None);
        assert_eq!(next.working_dir(), "/");
        assert!(next.scanned_hosts.contains("hq-node"));
    }
}
