//! Terminal User Interface
//!
//! ratatui front-end for the Link26 console

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::LineKind;
use crate::game::trace::TraceStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the terminal
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Green,
            alert: Color::Red,
            success: Color::LightGreen,
            warning: Color::Yellow,
            info: Color::Gray,
            border: Color::DarkGray,
            header: Color::Cyan,
        }
    }
}

/// Color for a transcript line
pub fn line_color(kind: LineKind, theme: &Theme) -> Color {
    match kind {
        LineKind::Info => theme.info,
        LineKind::Command => theme.header,
        LineKind::Error => theme.alert,
        LineKind::Success => theme.success,
        LineKind::Warning => theme.warning,
    }
}

/// Color for a trace tier
pub fn trace_color(status: TraceStatus) -> Color {
    match status {
        TraceStatus::Calm => Color::Green,
        TraceStatus::Alert => Color::Yellow,
        TraceStatus::Hunt => Color::LightRed,
        TraceStatus::Lockdown => Color::Red,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Smaller logo for header
pub const SMALL_LOGO: &str = " LINK26 :: TERMINAL ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════════════════════╗
║                       CONTROLS                                ║
╠═══════════════════════════════════════════════════════════════╣
║  Enter     Run the typed command                              ║
║  ↑/↓       Walk command history                               ║
║  PgUp/PgDn Scroll the transcript                              ║
║  Esc       Clear the input line / close this help             ║
║  F1        Toggle this help                                   ║
║  F5        Reset the world (wipes the save)                   ║
║  Ctrl+C    Quit                                               ║
╠═══════════════════════════════════════════════════════════════╣
║                      FIRST STEPS                              ║
╠═══════════════════════════════════════════════════════════════╣
║  inbox / accept <id>      Pick up a contract                  ║
║  route add proxy-1        Hide behind a proxy                 ║
║  scan <host>              Recon before you connect            ║
║  connect <host>           Open a session                      ║
║  guide                    Ask for the next step               ║
╚═══════════════════════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(1),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the game content layout (terminal + side panels)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(68),  // Terminal
            Constraint::Percentage(32),  // Side panels
        ])
        .split(area)
        .to_vec()
}

/// Stack of side panels: trace, route, guidance, inbox, inventory
pub fn create_side_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(6),
        ])
        .split(area)
        .to_vec()
}
