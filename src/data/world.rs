//! Hosts, proxies and the remote filesystems they carry

use super::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport protocol of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    pub requires_creds: bool,
    pub multi_factor: bool,
}

/// A listening service on a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub port: u16,
    pub proto: Protocol,
    pub name: String,
    pub banner: Option<String>,
    pub version_hint: Option<String>,
    pub exposure: f64,           // 0-1, how visible the port is from outside
    pub access_rules: AccessRules,
}

impl Service {
    pub fn tcp(port: u16, name: &str, banner: &str, exposure: f64, access_rules: AccessRules) -> Self {
        Self {
            port,
            proto: Protocol::Tcp,
            name: name.to_string(),
            banner: Some(banner.to_string()),
            version_hint: None,
            exposure,
            access_rules,
        }
    }

    /// Port state as reported by a scan
    pub fn state(&self) -> &'static str {
        if self.exposure > 0.6 {
            "open"
        } else if self.exposure > 0.35 {
            "filtered"
        } else {
            "closed"
        }
    }

    pub fn info(&self) -> &str {
        self.banner
            .as_deref()
            .or(self.version_hint.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Dir => write!(f, "dir"),
        }
    }
}

/// One entry of a remote filesystem, addressed by its absolute path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsEntry {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    pub content: Option<String>,
}

impl FsEntry {
    pub fn file(path: &str, content: &str) -> Self {
        Self {
            path: path.to_string(),
            name: file_name(path).to_string(),
            kind: EntryKind::File,
            content: Some(content.to_string()),
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: file_name(path).to_string(),
            kind: EntryKind::Dir,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFlags {
    pub honeypot: bool,
    pub rate_limited: bool,
}

/// A remote machine the player can scan and break into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub label: String,
    pub geo: GeoPoint,
    pub monitoring: f64,         // 0-1, detection sensitivity
    pub services: Vec<Service>,
    pub filesystem: Vec<FsEntry>,
    pub logs: Vec<LogEntry>,
    pub flags: HostFlags,
}

impl Host {
    pub fn entry(&self, path: &str) -> Option<&FsEntry> {
        self.filesystem.iter().find(|e| e.path == path)
    }

    pub fn service(&self, port: u16) -> Option<&Service> {
        self.services.iter().find(|s| s.port == port)
    }

    /// Entries whose parent directory is exactly `dir`
    pub fn list_dir(&self, dir: &str) -> Vec<&FsEntry> {
        let dir = normalize_path(dir);
        self.filesystem
            .iter()
            .filter(|e| parent_dir(&e.path) == dir)
            .collect()
    }
}

/// An anonymizing relay the player can chain into a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyNode {
    pub id: String,
    pub label: String,
    pub geo: GeoPoint,
    pub stability: f64,
    pub anonymity: f64,
    pub heat: f64,               // 0-1, burned out at 1
    pub cost_per_use: u32,
}

impl ProxyNode {
    pub fn is_burned(&self) -> bool {
        self.heat >= 1.0
    }
}

/// The static network map: hosts and proxies in generation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub hosts: Vec<Host>,
    pub proxies: Vec<ProxyNode>,
}

impl World {
    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn host_mut(&mut self, id: &str) -> Option<&mut Host> {
        self.hosts.iter_mut().find(|h| h.id == id)
    }

    pub fn proxy(&self, id: &str) -> Option<&ProxyNode> {
        self.proxies.iter().find(|p| p.id == id)
    }

    pub fn proxy_mut(&mut self, id: &str) -> Option<&mut ProxyNode> {
        self.proxies.iter_mut().find(|p| p.id == id)
    }

    /// Look a host up by id, falling back to a label substring match
    pub fn find_host(&self, query: &str) -> Option<&Host> {
        let needle = query.to_lowercase();
        self.hosts
            .iter()
            .find(|h| h.id.eq_ignore_ascii_case(query))
            .or_else(|| self.hosts.iter().find(|h| h.label.to_lowercase().contains(&needle)))
    }
}

/// Last path segment
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("/")
}

/// Drop trailing slashes, keeping the root as "/"
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn parent_dir(path: &str) -> String {
    let path = normalize_path(path);
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Resolve `arg` against the working directory. Absolute arguments pass through.
pub fn resolve_path(working_dir: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        normalize_path(arg)
    } else {
        let base = normalize_path(working_dir);
        if base == "/" {
            normalize_path(&format!("/{}", arg))
        } else {
            normalize_path(&format!("{}/{}", base, arg))
        }
    }
}
