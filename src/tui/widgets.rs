//! Custom widgets for the terminal UI

use crate::game::interpreter::{Signal, SoundCue};
use crate::game::trace::TraceInfo;
use crate::tui::trace_color;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Trace level as a labelled bar, colored by tier
pub struct TraceMeter<'a> {
    trace: &'a TraceInfo,
}

impl<'a> TraceMeter<'a> {
    pub fn new(trace: &'a TraceInfo) -> Self {
        Self { trace }
    }
}

impl Widget for TraceMeter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let color = trace_color(self.trace.status);
        let label = format!("{:.1}% {}", self.trace.level, self.trace.status);
        buf.set_string(area.x, area.y, &label, Style::default().fg(color).add_modifier(Modifier::BOLD));

        if area.height > 1 {
            let inner = area.width - 2;
            let filled = ((self.trace.level / 100.0) * inner as f64).round() as u16;
            let filled = filled.min(inner);
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

/// Flash of the last command's sound cue, shown in the status bar
pub struct SignalBadge<'a> {
    signal: &'a Signal,
}

impl<'a> SignalBadge<'a> {
    pub fn new(signal: &'a Signal) -> Self {
        Self { signal }
    }

    fn color(&self) -> Color {
        match self.signal.sound {
            SoundCue::Alert => Color::Red,
            SoundCue::Success => Color::Green,
            SoundCue::Scan | SoundCue::Connect => Color::Cyan,
            SoundCue::RouteAdd | SoundCue::FileOp => Color::Magenta,
            SoundCue::Click | SoundCue::Beep => Color::Gray,
        }
    }
}

impl Widget for SignalBadge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut text = format!("♪ {}", self.signal.sound.name());
        if let Some(vfx) = &self.signal.vfx {
            if let Some(target) = &vfx.target {
                text.push_str(&format!(" @ {}", target));
            }
        }
        buf.set_stringn(
            area.x,
            area.y,
            &text,
            area.width as usize,
            Style::default().fg(self.color()).add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::interpreter::{VfxEvent, VfxKind};

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn meter_fills_proportionally() {
        let trace = TraceInfo::new(50.0, "x");
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        TraceMeter::new(&trace).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("50.0% HUNT"));
        assert_eq!(row(&buf, 1), "[█████░░░░░]");
    }

    #[test]
    fn badge_names_cue_and_target() {
        let signal = Signal {
            sound: SoundCue::Scan,
            vfx: Some(VfxEvent::at(VfxKind::Scan, "iris")),
        };
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        SignalBadge::new(&signal).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("♪ scan @ iris"));
    }
}
