//! Terminal input parsing
//!
//! Raw input is tokenized on whitespace, matched against the command keys
//! (two-word keys first) and turned into a typed [`Command`]. `--flags` are
//! pulled out of the positional arguments before the arguments are checked.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two-word command keys. Both tokens are consumed when the input starts with one.
pub const MULTI_WORD_KEYS: [&str; 7] = [
    "proxy list",
    "proxy info",
    "route add",
    "route rm",
    "route show",
    "route clear",
    "wipe logs",
];

pub const FLAG_PREFIX: &str = "--";
pub const LOCAL_DESTINATION: &str = "@local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    Stealth,
    Standard,
    Aggressive,
}

impl ScanMode {
    pub fn from_flags(flags: &[String]) -> Self {
        if flags.iter().any(|f| f == "stealth") {
            ScanMode::Stealth
        } else if flags.iter().any(|f| f == "aggr") {
            ScanMode::Aggressive
        } else {
            ScanMode::Standard
        }
    }

    pub fn base_noise(&self) -> f64 {
        match self {
            ScanMode::Stealth => 6.0,
            ScanMode::Standard => 12.0,
            ScanMode::Aggressive => 18.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanMode::Stealth => "STEALTH",
            ScanMode::Standard => "STANDARD",
            ScanMode::Aggressive => "AGGRESSIVE",
        }
    }
}

/// Every command the terminal understands, with its argument shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Status,
    Settings,
    Tools,
    Inventory,
    Guide,
    Inbox,
    Read { mission: String },
    Accept { mission: String },
    Missions,
    Submit { mission: String },
    ProxyList,
    ProxyInfo { proxy: String },
    RouteShow,
    RouteAdd { proxy: String },
    RouteRm { proxy: String },
    RouteClear,
    Scan { host: String, mode: ScanMode },
    Probe { host: String, port: i64 },   // Any integer; out-of-range ports just read as filtered
    Fingerprint { host: String },
    Connect { host: String },
    Disconnect,
    Pwd,
    Ls { path: Option<String> },
    Cd { dir: Option<String> },
    Cat { file: String },
    Cp { src: String, dst: String },
    Rm { path: String },
    Edit { file: String, data: String },
    WipeLogs,
    Market,
    Buy { item: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No command entered.")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {usage}")]
    Usage { usage: &'static str },
}

/// Help-table row for a command key
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub key: &'static str,
    pub syntax: &'static str,
    pub description: &'static str,
}

pub const REGISTRY: [CommandSpec; 34] = [
    CommandSpec { key: "help", syntax: "help", description: "Show the available commands" },
    CommandSpec { key: "clear", syntax: "clear", description: "Clear the terminal buffer" },
    CommandSpec { key: "status", syntax: "status", description: "Show core stats" },
    CommandSpec { key: "settings", syntax: "settings", description: "Show where settings live" },
    CommandSpec { key: "tools", syntax: "tools", description: "List your tool loadout" },
    CommandSpec { key: "inventory", syntax: "inventory", description: "List captured files" },
    CommandSpec { key: "guide", syntax: "guide", description: "Suggest the next mission step" },
    CommandSpec { key: "inbox", syntax: "inbox", description: "List open missions" },
    CommandSpec { key: "read", syntax: "read <id>", description: "Show mission detail" },
    CommandSpec { key: "accept", syntax: "accept <id>", description: "Accept a mission" },
    CommandSpec { key: "missions", syntax: "missions", description: "List active missions" },
    CommandSpec { key: "submit", syntax: "submit <id>", description: "Submit mission results" },
    CommandSpec { key: "proxy list", syntax: "proxy list", description: "Show available proxies" },
    CommandSpec { key: "proxy info", syntax: "proxy info <id>", description: "Show proxy details" },
    CommandSpec { key: "route show", syntax: "route show", description: "Show current route" },
    CommandSpec { key: "route add", syntax: "route add <proxy>", description: "Append proxy to route" },
    CommandSpec { key: "route rm", syntax: "route rm <proxy>", description: "Remove proxy" },
    CommandSpec { key: "route clear", syntax: "route clear", description: "Clear the current route" },
    CommandSpec { key: "scan", syntax: "scan <host> [--stealth|--aggr]", description: "Run a simulated scan" },
    CommandSpec { key: "probe", syntax: "probe <host> <port>", description: "Probe a single port" },
    CommandSpec { key: "fingerprint", syntax: "fingerprint <host>", description: "Guess the OS" },
    CommandSpec { key: "connect", syntax: "connect <host>", description: "Establish a session" },
    CommandSpec { key: "disconnect", syntax: "disconnect", description: "Drop the connection" },
    CommandSpec { key: "exit", syntax: "exit", description: "Drop a connection or exit" },
    CommandSpec { key: "pwd", syntax: "pwd", description: "Show working directory" },
    CommandSpec { key: "ls", syntax: "ls [path]", description: "List files" },
    CommandSpec { key: "cd", syntax: "cd <dir>", description: "Change working directory" },
    CommandSpec { key: "cat", syntax: "cat <file>", description: "Read a remote file" },
    CommandSpec { key: "cp", syntax: "cp <src> <dst>", description: "Copy files" },
    CommandSpec { key: "rm", syntax: "rm <path>", description: "Remove a file" },
    CommandSpec { key: "edit", syntax: "edit <file> key=value", description: "Edit simple metadata" },
    CommandSpec { key: "wipe logs", syntax: "wipe logs", description: "Clear the log trail" },
    CommandSpec { key: "market", syntax: "market", description: "Inspect the market" },
    CommandSpec { key: "buy", syntax: "buy <item>", description: "Buy a tool" },
];

/// Input split into its command key, positional arguments and flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub key: String,
    pub args: Vec<String>,
    pub flags: Vec<String>,
}

pub fn tokenize(input: &str) -> Option<Tokens> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let first = tokens.first()?.to_lowercase();

    let (key, rest) = match tokens.get(1) {
        Some(second) => {
            let candidate = format!("{} {}", first, second.to_lowercase());
            if MULTI_WORD_KEYS.contains(&candidate.as_str()) {
                (candidate, &tokens[2..])
            } else {
                (first, &tokens[1..])
            }
        }
        None => (first, &tokens[1..]),
    };

    let (flags, args): (Vec<&str>, Vec<&str>) = rest.iter().partition(|t| t.starts_with(FLAG_PREFIX));
    Some(Tokens {
        key,
        args: args.into_iter().map(str::to_string).collect(),
        flags: flags
            .into_iter()
            .map(|f| f.strip_prefix(FLAG_PREFIX).unwrap_or(f).to_string())
            .collect(),
    })
}

fn required(args: &[String], index: usize, usage: &'static str) -> Result<String, ParseError> {
    args.get(index).cloned().ok_or(ParseError::Usage { usage })
}

pub fn parse(input: &str) -> Result<Command, ParseError> {
    let Tokens { key, args, flags } = tokenize(input.trim()).ok_or(ParseError::Empty)?;

    let command = match key.as_str() {
        "help" => Command::Help,
        "clear" => Command::Clear,
        "status" => Command::Status,
        "settings" => Command::Settings,
        "tools" => Command::Tools,
        "inventory" | "inv" => Command::Inventory,
        "guide" => Command::Guide,
        "inbox" => Command::Inbox,
        "read" => Command::Read { mission: required(&args, 0, "read <id>")? },
        "accept" => Command::Accept { mission: required(&args, 0, "accept <id>")? },
        "missions" => Command::Missions,
        "submit" => Command::Submit { mission: required(&args, 0, "submit <id>")? },
        "proxy list" => Command::ProxyList,
        "proxy info" => Command::ProxyInfo { proxy: required(&args, 0, "proxy info <id>")? },
        "route show" => Command::RouteShow,
        "route add" => Command::RouteAdd { proxy: required(&args, 0, "route add <proxy>")? },
        "route rm" => Command::RouteRm { proxy: required(&args, 0, "route rm <proxy>")? },
        "route clear" => Command::RouteClear,
        "scan" => Command::Scan {
            host: required(&args, 0, "scan <host> [--stealth|--aggr]")?,
            mode: ScanMode::from_flags(&flags),
        },
        "probe" => {
            const USAGE: &str = "probe <host> <port>";
            let host = required(&args, 0, USAGE)?;
            let port = required(&args, 1, USAGE)?
                .parse::<i64>()
                .map_err(|_| ParseError::Usage { usage: USAGE })?;
            Command::Probe { host, port }
        }
        "fingerprint" => Command::Fingerprint { host: required(&args, 0, "fingerprint <host>")? },
        "connect" => Command::Connect { host: required(&args, 0, "connect <host>")? },
        "disconnect" | "exit" => Command::Disconnect,
        "pwd" => Command::Pwd,
        "ls" => Command::Ls { path: args.first().cloned() },
        "cd" => Command::Cd { dir: args.first().cloned() },
        "cat" => Command::Cat { file: required(&args, 0, "cat <file>")? },
        "cp" => Command::Cp {
            src: required(&args, 0, "cp <src> <dst>")?,
            dst: required(&args, 1, "cp <src> <dst>")?,
        },
        "rm" => Command::Rm { path: required(&args, 0, "rm <file>")? },
        "edit" => Command::Edit {
            file: required(&args, 0, "edit <file> key=value")?,
            data: required(&args, 1, "edit <file> key=value")?,
        },
        "wipe logs" => Command::WipeLogs,
        "market" => Command::Market,
        "buy" => Command::Buy { item: args.first().cloned() },
        _ => return Err(ParseError::Unknown(key)),
    };
    Ok(command)
}
