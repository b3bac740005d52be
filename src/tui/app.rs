//! Main application state and rendering

use crate::config::GameConfig;
use crate::data::Line as TermLine;
use crate::game::console::{Console, Submission};
use crate::game::interpreter::{Signal, SoundCue};
use crate::game::missions::next_step;
use crate::save::SaveProvider;
use crate::tui::widgets::{SignalBadge, TraceMeter};
use crate::tui::{
    create_content_layout, create_main_layout, create_side_layout, line_color, styled_block,
    Theme, HELP_TEXT, SMALL_LOGO,
};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::io::Write;
use std::time::{Duration, Instant};

const INPUT_POLL: Duration = Duration::from_millis(50);
const FLASH_FOR: Duration = Duration::from_millis(900);

/// Application state
pub struct App {
    pub console: Console,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub input_buffer: String,
    pub history_index: Option<usize>,
    pub scroll_back: usize,           // Lines scrolled up from the bottom
    flash: Option<(Signal, Instant)>,
    last_frame: Instant,
    last_decay: Instant,
    decay_interval: Duration,
}

impl App {
    pub fn new(provider: Box<dyn SaveProvider>, config: &GameConfig) -> Self {
        let mut console = Console::new(provider, config, Utc::now());
        console.load_saved();
        let now = Instant::now();

        Self {
            console,
            theme: Theme::default(),
            running: true,
            show_help: false,
            input_buffer: String::new(),
            history_index: None,
            scroll_back: 0,
            flash: None,
            last_frame: now,
            last_decay: now,
            decay_interval: config.decay_interval(),
        }
    }

    /// Pump staged output, the decay timer and the signal flash
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.console.advance(elapsed) > 0 {
            self.scroll_back = 0;
        }

        if now.duration_since(self.last_decay) >= self.decay_interval {
            self.last_decay = now;
            self.console.decay_tick();
        }

        if let Some(signal) = self.console.take_signal() {
            if signal.sound == SoundCue::Alert {
                ring_bell();
            }
            self.flash = Some((signal, now));
        }
        if self.flash.as_ref().is_some_and(|(_, at)| now.duration_since(*at) > FLASH_FOR) {
            self.flash = None;
        }
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(true);
                }

                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.running = false;
                        return Ok(false);
                    }
                    KeyCode::F(1) => self.show_help = !self.show_help,
                    KeyCode::F(5) => {
                        self.console.reset_world(Utc::now());
                        self.input_buffer.clear();
                        self.history_index = None;
                        self.scroll_back = 0;
                    }
                    KeyCode::Esc => {
                        if self.show_help {
                            self.show_help = false;
                        } else {
                            self.input_buffer.clear();
                            self.history_index = None;
                        }
                    }
                    KeyCode::Enter => self.execute_command(),
                    KeyCode::Backspace => {
                        self.input_buffer.pop();
                    }
                    KeyCode::Up => self.walk_history(true),
                    KeyCode::Down => self.walk_history(false),
                    KeyCode::PageUp => {
                        let max = self.console.transcript().len();
                        self.scroll_back = (self.scroll_back + 10).min(max);
                    }
                    KeyCode::PageDown => {
                        self.scroll_back = self.scroll_back.saturating_sub(10);
                    }
                    KeyCode::Char(c) => self.input_buffer.push(c),
                    _ => {}
                }
            }
        }
        Ok(true)
    }

    /// Execute the typed command
    fn execute_command(&mut self) {
        match self.console.submit(&self.input_buffer, Utc::now()) {
            Submission::Accepted => {
                self.input_buffer.clear();
                self.history_index = None;
                self.scroll_back = 0;
                self.last_frame = Instant::now();
            }
            // Keep the buffer so the command can be sent once output settles
            Submission::Busy => {}
        }
    }

    fn walk_history(&mut self, older: bool) {
        let history = self.console.history();
        if history.is_empty() {
            return;
        }
        let next = match (self.history_index, older) {
            (None, true) => Some(0),
            (None, false) => None,
            (Some(i), true) => Some((i + 1).min(history.len() - 1)),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
        self.history_index = next;
        self.input_buffer = next.map(|i| history[i].clone()).unwrap_or_default();
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = create_main_layout(area);

        self.render_header(frame, layout[0]);

        let content = create_content_layout(layout[1]);
        self.render_terminal(frame, content[0]);
        self.render_side_panel(frame, content[1]);

        self.render_status_bar(frame, layout[2]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(22),
                Constraint::Min(20),
                Constraint::Length(30),
            ])
            .split(area);

        let state = self.console.state();

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(logo, header_layout[0]);

        let target = match &state.session.connected_host {
            Some(host) => format!("Connected: {} {}", host, state.session.working_dir()),
            None => match &state.session.current_target {
                Some(host) => format!("Target: {} (not connected)", host),
                None => "No active session".to_string(),
            },
        };
        let title = Paragraph::new(target)
            .style(Style::default().fg(self.theme.warning))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(title, header_layout[1]);

        let wallet = format!(" {}c | {} rep ", state.cash, state.reputation);
        let wallet = Paragraph::new(wallet)
            .style(Style::default().fg(self.theme.fg))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(wallet, header_layout[2]);
    }

    fn render_terminal(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),      // Transcript
                Constraint::Length(3),   // Input line
            ])
            .split(area);

        let transcript = self.console.transcript();
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let end = transcript.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(visible);
        let lines: Vec<Line> = transcript[start..end]
            .iter()
            .map(|line| {
                let mut style = Style::default().fg(line_color(line.kind, &self.theme));
                if line.kind == crate::data::LineKind::Command {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Line::from(Span::styled(line.text.as_str(), style))
            })
            .collect();

        let title = if self.scroll_back > 0 {
            format!("Terminal (-{})", self.scroll_back)
        } else {
            "Terminal".to_string()
        };
        let terminal = Paragraph::new(lines)
            .block(styled_block(&title, &self.theme))
            .wrap(Wrap { trim: false });
        frame.render_widget(terminal, chunks[0]);

        let busy = self.console.is_busy();
        let prompt = match self.console.next_phase() {
            Some(phase) => format!("lnk> {} [{}...]", self.input_buffer, phase.name()),
            None => format!("lnk> {}_", self.input_buffer),
        };
        let border = if busy { self.theme.warning } else { self.theme.accent };
        let input = Paragraph::new(prompt)
            .style(Style::default().fg(if busy { Color::DarkGray } else { Color::Green }))
            .block(Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Command "));
        frame.render_widget(input, chunks[1]);
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let chunks = create_side_layout(area);
        let state = self.console.state();

        let trace_block = styled_block("Trace", &self.theme);
        let inner = trace_block.inner(chunks[0]);
        frame.render_widget(trace_block, chunks[0]);
        frame.render_widget(TraceMeter::new(&state.trace), inner);

        let route = &state.route;
        let route_text = vec![
            Line::from(route.describe()),
            Line::from(vec![
                Span::raw("Anon "),
                Span::styled(format!("{:.1}%", route.anonymity * 100.0), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}ms", route.latency_ms)),
            ]),
        ];
        let route_panel = Paragraph::new(route_text)
            .block(styled_block("Route", &self.theme))
            .wrap(Wrap { trim: true });
        frame.render_widget(route_panel, chunks[1]);

        let guide_lines = match state.active_missions().next() {
            Some(mission) => {
                let step = next_step(mission, &state.session, !route.is_direct(), &state.inventory);
                vec![
                    Line::from(Span::styled(mission.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
                    self.styled_line(&step),
                ]
            }
            None => vec![Line::from(Span::styled(
                "No active mission. Check inbox to accept one.",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        let guide = Paragraph::new(guide_lines)
            .block(styled_block("Next Step", &self.theme))
            .wrap(Wrap { trim: true });
        frame.render_widget(guide, chunks[2]);

        let inbox: Vec<Line> = state
            .inbox
            .iter()
            .map(|m| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", m.status.to_string()), Style::default().fg(Color::DarkGray)),
                    Span::raw(m.title.clone()),
                ])
            })
            .collect();
        let inbox = Paragraph::new(inbox).block(styled_block("Inbox", &self.theme));
        frame.render_widget(inbox, chunks[3]);

        let loot: Vec<Line> = if state.inventory.is_empty() {
            vec![Line::from(Span::styled("empty", Style::default().fg(Color::DarkGray)))]
        } else {
            state
                .inventory
                .iter()
                .rev()
                .map(|item| Line::from(format!("{} ({})", item.label, item.source)))
                .collect()
        };
        let inventory = Paragraph::new(loot).block(styled_block("Inventory", &self.theme));
        frame.render_widget(inventory, chunks[4]);
    }

    fn styled_line(&self, line: &TermLine) -> Line<'static> {
        Line::from(Span::styled(
            line.text.clone(),
            Style::default().fg(line_color(line.kind, &self.theme)),
        ))
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(28)])
            .split(area);

        let state = self.console.state();
        let status_text = format!(
            " {} | scanned {} | save: {} | F1 help | F5 reset | Ctrl+C quit ",
            state.trace.last_event.as_deref().unwrap_or("-"),
            state.session.scanned_hosts.len(),
            self.console.provider_name(),
        );
        let status = Paragraph::new(status_text)
            .style(Style::default().fg(self.theme.fg).bg(Color::DarkGray));
        frame.render_widget(status, chunks[0]);

        if let Some((signal, _)) = &self.flash {
            frame.render_widget(SignalBadge::new(signal), chunks[1]);
        }
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_width = 70.min(area.width.saturating_sub(4));
        let popup_height = 25.min(area.height.saturating_sub(4));
        let popup_area = Rect::new(
            (area.width - popup_width) / 2,
            (area.height - popup_height) / 2,
            popup_width,
            popup_height,
        );

        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}

fn ring_bell() {
    let mut out = std::io::stdout();
    if out.write_all(b"\x07").and_then(|_| out.flush()).is_err() {
        tracing::debug!(target: "link26::tui", "bell failed");
    }
}
