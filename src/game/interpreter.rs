//! Command dispatch and game rules
//!
//! [`reduce`] takes a state snapshot and a parsed [`Command`] and returns an
//! [`Outcome`]: the next state plus everything the front-end needs to show
//! for it. The input state is never touched. Handlers that reject a command
//! return before mutating, so a rejected command yields an equal state.

use super::announce::{Announcement, ExecutionPhase};
use super::command::{parse, Command, ParseError, ScanMode, LOCAL_DESTINATION};
use super::route::build_route;
use super::{formatting, missions, trace, GameState};
use crate::data::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heat a proxy picks up every time it joins a route
const HEAT_PER_USE: f64 = 0.15;
const HEAT_COMPOUND: f64 = 0.1;
const OVERHEAT_WARNING: f64 = 0.8;

const CONNECT_BASE_NOISE: f64 = 15.0;
const UNSCANNED_PENALTY: f64 = 35.0;
const DIRECT_PENALTY: f64 = 40.0;
const COMBINED_PENALTY: f64 = 20.0;

const PROBE_NOISE: f64 = 5.0;
const FINGERPRINT_NOISE: f64 = 4.0;
const COPY_NOISE: f64 = 6.0;
const REMOVE_NOISE: f64 = 7.0;
const EDIT_NOISE: f64 = 5.0;
const WIPE_NOISE: f64 = 10.0;

/// Sound the front-end should play for a command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundCue {
    #[default]
    Click,
    Beep,
    Alert,
    Scan,
    Connect,
    Success,
    RouteAdd,
    FileOp,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Beep => "beep",
            SoundCue::Alert => "alert",
            SoundCue::Scan => "scan",
            SoundCue::Connect => "connect",
            SoundCue::Success => "success",
            SoundCue::RouteAdd => "routeAdd",
            SoundCue::FileOp => "fileOp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VfxKind {
    Scan,
    Alert,
    Success,
    Idle,
    Connect,
}

/// Visual hint for the renderer, optionally pinned to a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfxEvent {
    pub kind: VfxKind,
    pub target: Option<String>,
    pub value: Option<String>,   // Raw input that caused it, filled in by the console
}

impl VfxEvent {
    pub fn new(kind: VfxKind) -> Self {
        Self { kind, target: None, value: None }
    }

    pub fn at(kind: VfxKind, target: &str) -> Self {
        Self { kind, target: Some(target.to_string()), value: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub sound: SoundCue,
    pub vfx: Option<VfxEvent>,
}

/// Everything a single command produced
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub state: GameState,
    pub lines: Vec<Line>,
    pub signal: Signal,
    pub clear: bool,
    pub announcements: Vec<Announcement>,
}

impl Outcome {
    fn start(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            lines: Vec::new(),
            signal: Signal::default(),
            clear: false,
            announcements: Vec::new(),
        }
    }

    fn emit(&mut self, line: Line) {
        self.lines.push(line);
    }

    fn emit_info<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(texts.into_iter().map(Line::info));
    }

    fn signal(&mut self, sound: SoundCue, vfx: Option<VfxEvent>) {
        self.signal = Signal { sound, vfx };
    }

    fn announce(&mut self, offset_ms: u64, phase: ExecutionPhase, line: Line) {
        self.announcements.push(Announcement::new(offset_ms, phase, line));
    }

    /// Feed noise into the trace meter, attributed to `host_id`
    fn noise(&mut self, base: f64, host_id: &str, now: DateTime<Utc>) {
        let next = trace::add_noise(
            &self.state.trace,
            base,
            &self.state.route,
            self.state.world.host(host_id),
        );
        tracing::debug!(
            target: "link26::trace",
            host = host_id,
            base,
            level = next.level,
            status = %next.status,
            "noise applied"
        );
        self.state.trace = next;
        self.state.time = now;
    }

    /// Id of the connected host, or an error line when there is none
    fn require_connection(&mut self) -> Option<String> {
        let host = self.state.connected_host().map(|h| h.id.clone());
        if host.is_none() {
            self.emit(Line::error("No host connected."));
        }
        host
    }

    fn resolve(&self, arg: &str) -> String {
        resolve_path(self.state.session.working_dir(), arg)
    }
}

/// Base connection noise: flat cost plus additive penalties for skipping recon
pub fn connection_noise(was_scanned: bool, has_route: bool) -> f64 {
    let mut noise = CONNECT_BASE_NOISE;
    if !was_scanned {
        noise += UNSCANNED_PENALTY;
    }
    if !has_route {
        noise += DIRECT_PENALTY;
    }
    if !was_scanned && !has_route {
        noise += COMBINED_PENALTY;
    }
    noise
}

/// Parse and run raw terminal input
pub fn run(state: &GameState, input: &str, now: DateTime<Utc>) -> Outcome {
    match parse(input) {
        Ok(command) => reduce(state, &command, now),
        Err(err) => reject(state, &err),
    }
}

/// Outcome for input that never became a command
pub fn reject(state: &GameState, err: &ParseError) -> Outcome {
    tracing::debug!(target: "link26::interpreter", error = %err, "input rejected");
    let mut out = Outcome::start(state);
    out.emit(Line::error(err.to_string()));
    if matches!(err, ParseError::Unknown(_)) {
        out.signal(SoundCue::Alert, None);
    }
    out
}

pub fn reduce(state: &GameState, command: &Command, now: DateTime<Utc>) -> Outcome {
    tracing::debug!(target: "link26::interpreter", ?command, "dispatch");
    let mut out = Outcome::start(state);

    match command {
        Command::Help => {
            out.emit_info(formatting::help_lines());
            out.signal(SoundCue::Beep, None);
        }
        Command::Clear => {
            out.clear = true;
            out.emit(Line::success("Terminal cleared."));
        }
        Command::Status => status(&mut out),
        Command::Settings => {
            out.emit(Line::info(
                "Settings live in the config file. Point LINK26_CONFIG at a JSON file to override them.",
            ));
        }
        Command::Tools => {
            let lines: Vec<String> = out.state.tools.iter().map(formatting::tool_line).collect();
            out.emit_info(lines);
        }
        Command::Inventory => inventory(&mut out),
        Command::Guide => guide(&mut out),
        Command::Inbox => {
            let lines: Vec<String> = out
                .state
                .inbox
                .iter()
                .map(formatting::mission_summary_line)
                .collect();
            out.emit_info(lines);
        }
        Command::Read { mission } => read(&mut out, mission),
        Command::Accept { mission } => accept(&mut out, mission),
        Command::Missions => active_missions(&mut out),
        Command::Submit { mission } => submit(&mut out, mission),
        Command::ProxyList => {
            out.emit_info(formatting::proxy_table(&state.world.proxies));
        }
        Command::ProxyInfo { proxy } => proxy_info(&mut out, proxy),
        Command::RouteShow => {
            let route = &out.state.route;
            let lines = [
                format!("Hops: {}", route.describe()),
                format!(
                    "Latency: {}ms | Anonymity: {:.1}%",
                    route.latency_ms,
                    route.anonymity * 100.0
                ),
            ];
            out.emit_info(lines);
        }
        Command::RouteAdd { proxy } => route_add(&mut out, proxy),
        Command::RouteRm { proxy } => route_rm(&mut out, proxy),
        Command::RouteClear => {
            out.state.route = build_route(&[], &out.state.world.proxies);
            out.emit(Line::success("Route cleared."));
        }
        Command::Scan { host, mode } => scan(&mut out, host, *mode, now),
        Command::Probe { host, port } => probe(&mut out, host, *port, now),
        Command::Fingerprint { host } => fingerprint(&mut out, host, now),
        Command::Connect { host } => connect(&mut out, host, now),
        Command::Disconnect => {
            let message = if out.state.is_connected() {
                "Disconnected. Trace will decay while idle."
            } else {
                "No active connection."
            };
            out.state.session = out.state.session.disconnected();
            out.emit(Line::info(message));
        }
        Command::Pwd => {
            let dir = out.state.session.working_dir().to_string();
            out.emit(Line::info(format!("Working directory: {}", dir)));
        }
        Command::Ls { path } => ls(&mut out, path.as_deref()),
        Command::Cd { dir } => cd(&mut out, dir.as_deref()),
        Command::Cat { file } => cat(&mut out, file),
        Command::Cp { src, dst } => copy(&mut out, src, dst, now),
        Command::Rm { path } => remove(&mut out, path, now),
        Command::Edit { file, data } => edit(&mut out, file, data, now),
        Command::WipeLogs => wipe_logs(&mut out, now),
        Command::Market => {
            out.emit(Line::info(
                "Market rotation offline. Check back after you rack more reputation.",
            ));
        }
        Command::Buy { .. } => out.emit(Line::info("Store coming soon.")),
    }

    out
}

fn status(out: &mut Outcome) {
    let s = &out.state;
    let lines = [
        format!("Cash: {}c | Reputation: {}", s.cash, s.reputation),
        format!("Trace: {:.1}% ({})", s.trace.level, s.trace.status),
        format!(
            "Route anonym.: {:.1}% | Hops: {}",
            s.route.anonymity * 100.0,
            s.route.hops.len()
        ),
        format!(
            "Connected host: {} | Working dir: {}",
            s.session.connected_host.as_deref().unwrap_or("none"),
            s.session.working_dir()
        ),
    ];
    out.emit_info(lines);
    out.signal(SoundCue::Beep, None);
}

fn inventory(out: &mut Outcome) {
    if out.state.inventory.is_empty() {
        out.emit(Line::info("Inventory empty."));
        return;
    }
    let lines: Vec<String> = out.state.inventory.iter().map(formatting::inventory_line).collect();
    out.emit_info(lines);
}

fn guide(out: &mut Outcome) {
    let s = &out.state;
    let line = s.active_missions().next().map(|mission| {
        (
            mission.title.clone(),
            missions::next_step(mission, &s.session, !s.route.is_direct(), &s.inventory),
        )
    });
    match line {
        Some((title, step)) => {
            out.emit(Line::info(format!("Active mission: {}", title)));
            out.emit(step);
        }
        None => out.emit(Line::info("No active mission. Check inbox to accept one.")),
    }
}

fn read(out: &mut Outcome, id: &str) {
    match out.state.mission(id).map(Mission::summary) {
        Some(summary) => out.emit_info(formatting::mission_detail(&summary)),
        None => out.emit(Line::error(format!("Mission {} not found.", id))),
    }
}

fn accept(out: &mut Outcome, id: &str) {
    let Some(mission) = out.state.mission(id) else {
        out.emit(Line::error(format!("Mission {} not found.", id)));
        return;
    };
    if mission.status != MissionStatus::Available {
        let line = Line::info(format!("{} is already {}.", mission.title, mission.status));
        out.emit(line);
        return;
    }
    let title = mission.title.clone();
    out.state.set_mission_status(id, MissionStatus::Accepted);
    tracing::info!(target: "link26::missions", mission = id, "accepted");
    out.emit(Line::success(format!("Mission {} accepted.", title)));
    out.signal(SoundCue::Beep, Some(VfxEvent::new(VfxKind::Success)));
}

fn active_missions(out: &mut Outcome) {
    let lines: Vec<String> = out
        .state
        .active_missions()
        .map(|m| formatting::mission_summary_line(&m.summary()))
        .collect();
    if lines.is_empty() {
        out.emit(Line::info("No active missions."));
    } else {
        out.emit_info(lines);
    }
}

fn submit(out: &mut Outcome, id: &str) {
    let Some(mission) = out.state.mission(id).cloned() else {
        out.emit(Line::error(format!("Mission {} not found.", id)));
        return;
    };
    if mission.status != MissionStatus::Accepted {
        out.emit(Line::error(format!("Mission {} is not active.", mission.title)));
        return;
    }
    if !missions::objective_met(&mission.objective, &out.state.world, &out.state.inventory) {
        out.emit(Line::error(format!("Mission {} requires additional work.", mission.title)));
        out.emit(Line::info("Check your inventory or edit the target file."));
        return;
    }

    out.state.cash += mission.reward.cash;
    out.state.reputation += mission.reward.reputation;
    out.state.set_mission_status(id, MissionStatus::Completed);
    tracing::info!(
        target: "link26::missions",
        mission = id,
        cash = mission.reward.cash,
        reputation = mission.reward.reputation,
        "completed"
    );
    out.emit(Line::success(format!("Mission {} completed!", mission.title)));
    out.emit(Line::success(format!(
        "+{}c  +{} reputation",
        mission.reward.cash, mission.reward.reputation
    )));
    out.signal(SoundCue::Success, Some(VfxEvent::new(VfxKind::Success)));
}

fn proxy_info(out: &mut Outcome, id: &str) {
    let Some(proxy) = out.state.world.proxy(id) else {
        out.emit(Line::error(format!("Proxy {} not found.", id)));
        return;
    };
    let lines = [
        format!("ID: {}", proxy.id),
        format!("Label: {}", proxy.label),
        format!("Anonymity: {:.1}%", proxy.anonymity * 100.0),
        format!("Heat: {:.1}%", proxy.heat * 100.0),
        format!("Cost: {}c", proxy.cost_per_use),
    ];
    out.emit_info(lines);
}

fn route_add(out: &mut Outcome, id: &str) {
    let Some((current, burned)) = out.state.world.proxy(id).map(|p| (p.heat, p.is_burned())) else {
        out.emit(Line::error(format!("Proxy {} unavailable.", id)));
        return;
    };
    if burned {
        out.emit(Line::error(format!("Proxy {} has burned out.", id)));
        return;
    }
    if out.state.route.contains(id) {
        out.emit(Line::error(format!("Proxy {} already in route.", id)));
        return;
    }

    let heat = (current + HEAT_PER_USE + current * HEAT_COMPOUND).clamp(0.0, 1.0);
    if let Some(proxy) = out.state.world.proxy_mut(id) {
        proxy.heat = heat;
    }
    if heat >= OVERHEAT_WARNING {
        out.emit(Line::warning(format!(
            "WARNING: Proxy {} is overheating ({:.0}%).",
            id,
            heat * 100.0
        )));
    }
    if heat >= 1.0 {
        tracing::warn!(target: "link26::route", proxy = id, "proxy burned out");
        out.emit(Line::error(format!(
            "CRITICAL: Proxy {} has burned out and is unusable.",
            id
        )));
    }

    let mut hops = out.state.route.hops.clone();
    hops.push(id.to_string());
    out.state.route = build_route(&hops, &out.state.world.proxies);
    out.emit(Line::success(format!("Proxy {} appended.", id)));
    out.signal(SoundCue::RouteAdd, Some(VfxEvent::new(VfxKind::Scan)));
}

fn route_rm(out: &mut Outcome, id: &str) {
    if !out.state.route.contains(id) {
        out.emit(Line::error(format!("{} is not part of the route.", id)));
        return;
    }
    let hops: Vec<String> = out
        .state
        .route
        .hops
        .iter()
        .filter(|hop| hop.as_str() != id)
        .cloned()
        .collect();
    out.state.route = build_route(&hops, &out.state.world.proxies);
    out.emit(Line::info(format!("Proxy {} removed.", id)));
}

fn hop_suffix(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

fn scan(out: &mut Outcome, query: &str, mode: ScanMode, now: DateTime<Utc>) {
    let Some(host) = out.state.world.find_host(query) else {
        out.emit(Line::error(format!("Host {} not found.", query)));
        return;
    };
    let (host_id, label) = (host.id.clone(), host.label.clone());
    let table = formatting::scan_table(host);
    let hops = out.state.route.hops.len();

    out.emit(Line::info(format!("[SCAN] Initiating {} scan on {}", mode.name(), label)));
    if hops > 0 {
        out.emit(Line::info(format!(
            "[ROUTE] Routing through {} proxy hop{}...",
            hops,
            hop_suffix(hops)
        )));
    } else {
        out.emit(Line::warning("[ROUTE] DIRECT CONNECTION - No proxy route!"));
    }

    out.noise(mode.base_noise(), &host_id, now);
    out.state.session.scanned_hosts.insert(&host_id);
    out.state.session.current_target = Some(host_id.clone());

    out.announce(
        400,
        ExecutionPhase::Enumerate,
        Line::info(format!("[PROBE] Enumerating ports on {}...", label)),
    );
    out.announce(
        800,
        ExecutionPhase::Fingerprint,
        Line::info("[PROBE] Fingerprinting services..."),
    );
    let mut done = vec![Line::success("[COMPLETE] Scan finished.")];
    done.extend(table.into_iter().map(Line::success));
    out.announcements
        .extend(Announcement::batch(1200, ExecutionPhase::Complete, done));

    out.signal(SoundCue::Scan, Some(VfxEvent::at(VfxKind::Scan, &host_id)));
}

fn probe(out: &mut Outcome, query: &str, port: i64, now: DateTime<Utc>) {
    let Some(host) = out.state.world.find_host(query) else {
        out.emit(Line::error("Usage: probe <host> <port>"));
        return;
    };
    let host_id = host.id.clone();
    let lines = match u16::try_from(port).ok().and_then(|p| host.service(p)) {
        None => vec![Line::info(format!("Port {} filtered (no service).", port))],
        Some(service) => {
            let banner = service
                .banner
                .as_deref()
                .or(service.version_hint.as_deref())
                .unwrap_or("unknown");
            let vigilance = if service.access_rules.multi_factor { "MFA" } else { "standard" };
            vec![
                Line::info(format!("{} ({}) | {}", service.name, service.proto, banner)),
                Line::info(format!(
                    "Exposure: {:.1}% | Vigilance: {}",
                    service.exposure * 100.0,
                    vigilance
                )),
            ]
        }
    };
    out.lines.extend(lines);
    out.noise(PROBE_NOISE, &host_id, now);
}

fn fingerprint(out: &mut Outcome, query: &str, now: DateTime<Utc>) {
    let Some(host_id) = out.state.world.find_host(query).map(|h| h.id.clone()) else {
        out.emit(Line::error("Specify a host to fingerprint."));
        return;
    };
    out.emit_info([
        "OS guess: Linux 68%, FreeBSD 18%, Unknown 14%",
        "Latency analysis suggests hardened kernel.",
    ]);
    out.noise(FINGERPRINT_NOISE, &host_id, now);
}

fn connect(out: &mut Outcome, query: &str, now: DateTime<Utc>) {
    let Some(host) = out.state.world.find_host(query) else {
        out.emit(Line::error(format!("Host {} not reachable.", query)));
        return;
    };
    let (host_id, label) = (host.id.clone(), host.label.clone());
    let was_scanned = out.state.session.scanned_hosts.contains(&host_id);
    let hops = out.state.route.hops.len();
    let has_route = hops > 0;

    out.emit(Line::info(format!("[CONNECT] Initiating session to {}...", label)));
    if has_route {
        out.emit(Line::info(format!(
            "[ROUTE] Establishing tunnel through {} hop{}",
            hops,
            hop_suffix(hops)
        )));
    } else {
        out.emit(Line::warning("[ROUTE] WARNING: Direct connection - no proxy!"));
    }

    out.state.session.connected_host = Some(host_id.clone());
    out.state.session.current_target = Some(host_id.clone());
    out.state.session.working_dir = Some("/".to_string());

    let noise = connection_noise(was_scanned, has_route);
    out.noise(noise, &host_id, now);
    let level = out.state.trace.level;
    tracing::info!(
        target: "link26::session",
        host = %host_id,
        was_scanned,
        hops,
        noise,
        "connected"
    );

    if !was_scanned {
        out.announce(
            300,
            ExecutionPhase::Warning,
            Line::warning("[!] WARNING: Host not scanned. IDS triggered."),
        );
    }
    if !has_route {
        out.announce(
            500,
            ExecutionPhase::Warning,
            Line::warning("[!] WARNING: No proxy route. IP exposed."),
        );
    }
    out.announce(
        700,
        ExecutionPhase::Handshake,
        Line::info("[HANDSHAKE] Negotiating encryption..."),
    );
    let established = format!("[SESSION] Connection established to {}", label);
    out.announce(
        1100,
        ExecutionPhase::Established,
        if was_scanned && has_route {
            Line::success(established)
        } else {
            Line::warning(established)
        },
    );
    let spike = format!("[TRACE] Noise spike: +{} | Current: {:.1}%", noise, level);
    out.announce(
        1100,
        ExecutionPhase::Established,
        if noise > 30.0 { Line::error(spike) } else { Line::warning(spike) },
    );

    if noise > 20.0 || level > 25.0 {
        out.signal(SoundCue::Alert, Some(VfxEvent::at(VfxKind::Alert, &host_id)));
    } else {
        out.signal(SoundCue::Connect, Some(VfxEvent::at(VfxKind::Connect, &host_id)));
    }
}

fn ls(out: &mut Outcome, path: Option<&str>) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    let dir = match path {
        Some(p) => out.resolve(p),
        None => out.state.session.working_dir().to_string(),
    };
    let rows: Vec<String> = out
        .state
        .world
        .host(&host_id)
        .map(|host| {
            host.list_dir(&dir)
                .into_iter()
                .map(|e| format!("{:<4} {}", e.kind.to_string(), e.name))
                .collect()
        })
        .unwrap_or_default();
    if rows.is_empty() {
        out.emit(Line::info("<empty directory>"));
    } else {
        out.emit_info(rows);
    }
}

fn cd(out: &mut Outcome, dir: Option<&str>) {
    if out.require_connection().is_none() {
        return;
    }
    let next = match dir {
        Some(d) => out.resolve(d),
        None => "/".to_string(),
    };
    out.emit(Line::info(format!("Set working dir to {}", next)));
    out.state.session.working_dir = Some(next);
}

fn cat(out: &mut Outcome, file: &str) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    let path = out.resolve(file);
    let content = out
        .state
        .world
        .host(&host_id)
        .and_then(|h| h.entry(&path))
        .map(|e| e.content.clone().unwrap_or_else(|| "[binary data]".to_string()));
    match content {
        Some(text) => out.emit(Line::info(text)),
        None => out.emit(Line::error(format!("{} not found.", file))),
    }
}

fn copy(out: &mut Outcome, src: &str, dst: &str, now: DateTime<Utc>) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    let path = out.resolve(src);
    let Some(entry) = out.state.world.host(&host_id).and_then(|h| h.entry(&path)).cloned() else {
        out.emit(Line::error(format!("{} not found.", src)));
        return;
    };
    if dst != LOCAL_DESTINATION {
        out.emit(Line::info("Only @local destination is supported for now."));
        return;
    }

    let item = InventoryItem {
        id: out.state.next_inventory_id(),
        label: entry.name.clone(),
        source: host_id.clone(),
        path: entry.path.clone(),
        content: entry.content.clone(),
    };
    tracing::debug!(target: "link26::inventory", item = %item.id, path = %item.path, "captured");
    out.state.inventory.push(item);
    out.emit(Line::success(format!("Copied {} into inventory.", entry.name)));
    out.noise(COPY_NOISE, &host_id, now);
    out.signal(SoundCue::FileOp, Some(VfxEvent::new(VfxKind::Success)));
}

fn remove(out: &mut Outcome, target: &str, now: DateTime<Utc>) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    let path = out.resolve(target);
    if let Some(host) = out.state.world.host_mut(&host_id) {
        host.filesystem.retain(|e| e.path != path);
    }
    out.emit(Line::success(format!("Removed {}.", target)));
    out.noise(REMOVE_NOISE, &host_id, now);
}

fn edit(out: &mut Outcome, file: &str, data: &str, now: DateTime<Utc>) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    let path = out.resolve(file);
    let entry = out
        .state
        .world
        .host_mut(&host_id)
        .and_then(|h| h.filesystem.iter_mut().find(|e| e.path == path));
    let Some(entry) = entry else {
        out.emit(Line::error(format!("{} not found.", file)));
        return;
    };
    entry.content = Some(format!("{} (tampered)", data));
    out.emit(Line::success(format!("Patched {}.", file)));
    out.noise(EDIT_NOISE, &host_id, now);
}

fn wipe_logs(out: &mut Outcome, now: DateTime<Utc>) {
    let Some(host_id) = out.require_connection() else {
        return;
    };
    if let Some(host) = out.state.world.host_mut(&host_id) {
        host.logs.clear();
    }
    out.noise(WIPE_NOISE, &host_id, now);
    out.emit(Line::warning("Logs wiped. Trace noise spiked."));
    out.signal(SoundCue::Alert, Some(VfxEvent::new(VfxKind::Alert)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::trace::TraceStatus;

    fn fresh() -> GameState {
        GameState::new(Utc::now())
    }

    fn exec(state: &GameState, input: &str) -> Outcome {
        run(state, input, Utc::now())
    }

    fn texts(out: &Outcome) -> Vec<&str> {
        out.lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn empty_input_reports_and_keeps_state() {
        let state = fresh();
        let out = exec(&state, "   ");
        assert_eq!(texts(&out), vec!["No command entered."]);
        assert_eq!(out.lines[0].kind, LineKind::Error);
        assert_eq!(out.state, state);
    }

    #[test]
    fn unknown_command_alerts() {
        let state = fresh();
        let out = exec(&state, "hack the planet");
        assert_eq!(texts(&out), vec!["Unknown command: hack"]);
        assert_eq!(out.signal.sound, SoundCue::Alert);
        assert_eq!(out.state, state);
    }

    #[test]
    fn default_cue_is_click() {
        let out = exec(&fresh(), "pwd");
        assert_eq!(out.signal, Signal::default());
        assert_eq!(out.signal.sound, SoundCue::Click);
        assert_eq!(texts(&out), vec!["Working directory: /"]);
    }

    #[test]
    fn clear_sets_flag() {
        let out = exec(&fresh(), "clear");
        assert!(out.clear);
        assert_eq!(out.lines[0].kind, LineKind::Success);
    }

    #[test]
    fn status_reports_core_stats() {
        let out = exec(&fresh(), "status");
        assert_eq!(
            texts(&out),
            vec![
                "Cash: 4200c | Reputation: 36",
                "Trace: 8.0% (CALM)",
                "Route anonym.: 0.0% | Hops: 0",
                "Connected host: none | Working dir: /",
            ]
        );
        assert_eq!(out.signal.sound, SoundCue::Beep);
    }

    #[test]
    fn accept_then_accept_again() {
        let state = fresh();
        let first = exec(&state, "accept mission-ghost");
        assert_eq!(texts(&first), vec!["Mission Ghost in the Archive accepted."]);
        assert_eq!(first.signal.vfx, Some(VfxEvent::new(VfxKind::Success)));
        assert_eq!(first.state.inbox[0].status, MissionStatus::Accepted);

        let second = exec(&first.state, "accept mission-ghost");
        assert_eq!(texts(&second), vec!["Ghost in the Archive is already accepted."]);
        assert_eq!(second.lines[0].kind, LineKind::Info);
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn unknown_mission() {
        let out = exec(&fresh(), "read mission-x");
        assert_eq!(texts(&out), vec!["Mission mission-x not found."]);
    }

    #[test]
    fn submit_without_accept_is_not_active() {
        let out = exec(&fresh(), "submit mission-ghost");
        assert_eq!(texts(&out), vec!["Mission Ghost in the Archive is not active."]);
    }

    #[test]
    fn route_add_heats_and_composes() {
        let out = exec(&fresh(), "route add proxy-1");
        assert_eq!(texts(&out), vec!["Proxy proxy-1 appended."]);
        assert_eq!(out.signal.sound, SoundCue::RouteAdd);
        assert!((out.state.world.proxy("proxy-1").unwrap().heat - 0.15).abs() < 1e-9);
        assert!((out.state.route.anonymity - 0.6).abs() < 1e-9);
        assert_eq!(out.state.route.latency_ms, 38);
    }

    #[test]
    fn route_add_rejects_unknown_and_duplicates() {
        let state = fresh();
        let out = exec(&state, "route add proxy-99");
        assert_eq!(texts(&out), vec!["Proxy proxy-99 unavailable."]);
        assert_eq!(out.state, state);

        let once = exec(&state, "route add proxy-2").state;
        let twice = exec(&once, "route add proxy-2");
        assert_eq!(texts(&twice), vec!["Proxy proxy-2 already in route."]);
        assert_eq!(twice.lines[0].kind, LineKind::Error);
        assert_eq!(twice.state, once);
    }

    #[test]
    fn route_rm_and_clear() {
        let state = exec(&fresh(), "route add proxy-1").state;
        let missing = exec(&state, "route rm proxy-4");
        assert_eq!(texts(&missing), vec!["proxy-4 is not part of the route."]);

        let removed = exec(&state, "route rm proxy-1");
        assert!(removed.state.route.is_direct());
        assert_eq!(removed.state.route.latency_ms, 0);
        // heat is not refunded
        assert!(removed.state.world.proxy("proxy-1").unwrap().heat > 0.0);

        let cleared = exec(&state, "route clear");
        assert!(cleared.state.route.is_direct());
    }

    #[test]
    fn scan_marks_host_and_stages_output() {
        let out = exec(&fresh(), "scan hq-node --stealth");
        assert_eq!(out.lines[0].text, "[SCAN] Initiating STEALTH scan on Nova Satellite HQ");
        assert_eq!(out.lines[1].kind, LineKind::Warning);
        assert!(out.state.session.scanned_hosts.contains("hq-node"));
        assert_eq!(out.state.session.current_target.as_deref(), Some("hq-node"));
        // 6 * 0.15 * 1.5
        assert!((out.state.trace.level - 9.35).abs() < 1e-9);
        assert_eq!(out.signal.vfx, Some(VfxEvent::at(VfxKind::Scan, "hq-node")));

        let offsets: Vec<u64> = out.announcements.iter().map(|a| a.offset_ms).collect();
        assert_eq!(offsets[..3], [400, 800, 1200]);
        assert_eq!(out.announcements.len(), 3 + 4);
        assert!(out.announcements[3..].iter().all(|a| a.line.kind == LineKind::Success));
    }

    #[test]
    fn scan_by_label_fragment() {
        let out = exec(&fresh(), "scan iris cloud");
        // only the first positional is the host
        assert!(out.state.session.scanned_hosts.contains("iris"));
    }

    #[test]
    fn scan_unknown_host_makes_no_noise() {
        let state = fresh();
        let out = exec(&state, "scan nowhere");
        assert_eq!(texts(&out), vec!["Host nowhere not found."]);
        assert_eq!(out.state, state);
        assert!(out.announcements.is_empty());
    }

    #[test]
    fn probe_reports_service_or_filtered() {
        let out = exec(&fresh(), "probe hq-node 443");
        assert_eq!(texts(&out), vec!["https (tcp) | nginx/1.24 TLS", "Exposure: 30.0% | Vigilance: MFA"]);
        let out = exec(&fresh(), "probe hq-node 21");
        assert_eq!(texts(&out), vec!["Port 21 filtered (no service)."]);
        assert!(out.state.trace.level > 8.0);
    }

    #[test]
    fn probe_out_of_range_port_is_filtered_and_noisy() {
        let out = exec(&fresh(), "probe hq-node 70000");
        assert_eq!(texts(&out), vec!["Port 70000 filtered (no service)."]);
        assert!(out.state.trace.level > 8.0);
        let out = exec(&fresh(), "probe hq-node -1");
        assert_eq!(texts(&out), vec!["Port -1 filtered (no service)."]);
    }

    #[test]
    fn probe_unknown_host_is_a_usage_error() {
        let state = fresh();
        let out = exec(&state, "probe nowhere 22");
        assert_eq!(texts(&out), vec!["Usage: probe <host> <port>"]);
        assert_eq!(out.state, state);
    }

    #[test]
    fn connection_noise_is_additive() {
        assert_eq!(connection_noise(false, false), 110.0);
        assert_eq!(connection_noise(true, false), 55.0);
        assert_eq!(connection_noise(false, true), 50.0);
        assert_eq!(connection_noise(true, true), 15.0);
    }

    #[test]
    fn raw_connect_spikes_trace() {
        let out = exec(&fresh(), "connect hq-node");
        assert_eq!(out.state.session.connected_host.as_deref(), Some("hq-node"));
        assert_eq!(out.state.session.working_dir.as_deref(), Some("/"));
        // 110 * 0.15 * 1.5 = 24.75 on top of 8
        assert!((out.state.trace.level - 32.75).abs() < 1e-9);
        assert_eq!(out.state.trace.status, TraceStatus::Alert);
        assert_eq!(out.signal.sound, SoundCue::Alert);

        let phases: Vec<u64> = out.announcements.iter().map(|a| a.offset_ms).collect();
        assert_eq!(phases, vec![300, 500, 700, 1100, 1100]);
        let spike = &out.announcements[4].line;
        assert!(spike.text.starts_with("[TRACE] Noise spike: +110 | Current: 32."));
        assert_eq!(spike.kind, LineKind::Error);
    }

    #[test]
    fn filesystem_requires_connection() {
        let state = fresh();
        for input in ["ls", "cd /logs", "cat /secrets.txt", "cp /secrets.txt @local", "rm /x", "edit /x a=b", "wipe logs"] {
            let out = exec(&state, input);
            assert_eq!(texts(&out), vec!["No host connected."], "{}", input);
            assert_eq!(out.state, state);
        }
    }

    #[test]
    fn relative_paths_follow_working_dir() {
        let state = exec(&fresh(), "connect iris").state;
        let state = exec(&state, "cd data/").state;
        assert_eq!(state.session.working_dir(), "/data");
        let out = exec(&state, "ls");
        assert_eq!(texts(&out), vec!["file vault.txt"]);
        let out = exec(&state, "cat vault.txt");
        assert_eq!(texts(&out), vec!["Ledger entries: 42"]);
    }

    #[test]
    fn cp_other_destination_is_soft() {
        let state = exec(&fresh(), "connect hq-node").state;
        let out = exec(&state, "cp /secrets.txt /tmp");
        assert_eq!(texts(&out), vec!["Only @local destination is supported for now."]);
        assert_eq!(out.lines[0].kind, LineKind::Info);
        assert_eq!(out.state, state);
    }

    #[test]
    fn rm_missing_path_still_succeeds() {
        let state = exec(&fresh(), "connect hq-node").state;
        let out = exec(&state, "rm /ghost.txt");
        assert_eq!(texts(&out), vec!["Removed /ghost.txt."]);
        assert_eq!(
            out.state.world.host("hq-node").unwrap().filesystem,
            state.world.host("hq-node").unwrap().filesystem
        );
    }

    #[test]
    fn edit_tampers_content() {
        let state = exec(&fresh(), "connect orbital").state;
        let out = exec(&state, "edit /logs/manifest.log window=delayed");
        assert_eq!(texts(&out), vec!["Patched /logs/manifest.log."]);
        let entry = out.state.world.host("orbital").unwrap().entry("/logs/manifest.log").unwrap();
        assert_eq!(entry.content.as_deref(), Some("window=delayed (tampered)"));

        let missing = exec(&state, "edit /nope.cfg a=b");
        assert_eq!(texts(&missing), vec!["/nope.cfg not found."]);
    }

    #[test]
    fn wipe_logs_clears_and_alerts() {
        let state = exec(&fresh(), "connect aurora").state;
        let out = exec(&state, "wipe logs");
        assert!(out.state.world.host("aurora").unwrap().logs.is_empty());
        assert_eq!(out.lines[0].kind, LineKind::Warning);
        assert_eq!(out.signal.sound, SoundCue::Alert);
        assert!(out.state.trace.level > state.trace.level);
    }

    #[test]
    fn disconnect_messages() {
        let out = exec(&fresh(), "exit");
        assert_eq!(texts(&out), vec!["No active connection."]);
        let state = exec(&fresh(), "connect hq-node").state;
        let out = exec(&state, "disconnect");
        assert_eq!(texts(&out), vec!["Disconnected. Trace will decay while idle."]);
        assert!(out.state.session.connected_host.is_none());
        assert!(out.state.session.working_dir.is_none());
    }

    #[test]
    fn guide_follows_first_accepted_mission() {
        let out = exec(&fresh(), "guide");
        assert_eq!(texts(&out), vec!["No active mission. Check inbox to accept one."]);

        let state = exec(&fresh(), "accept mission-orbital").state;
        let out = exec(&state, "guide");
        assert_eq!(out.lines[0].text, "Active mission: Orbital Whisper");
        assert_eq!(out.lines[1].text, "Build proxy route first");
    }

    #[test]
    fn stubs_are_informational() {
        assert_eq!(texts(&exec(&fresh(), "buy scanner")), vec!["Store coming soon."]);
        assert_eq!(exec(&fresh(), "market").lines[0].kind, LineKind::Info);
        assert_eq!(texts(&exec(&fresh(), "inventory")), vec!["Inventory empty."]);
        assert_eq!(exec(&fresh(), "tools").lines.len(), 4);
    }
}
