//! Top header with connection state, battery and uptime, plus the tab bar.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::command::Tab;
use crate::screen::Screen;
use crate::ui::theme::{MUTED, OFFLINE, ONLINE};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, host: &str, s: &Screen) {
    let (state, color) = match s.online {
        Some(true) => ("● Online", ONLINE),
        Some(false) => ("● Offline", OFFLINE),
        None => ("○ Connecting...", MUTED),
    };
    let mut spans = vec![
        Span::styled("vpsdash", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" | {host} | ")),
        Span::styled(state, Style::default().fg(color)),
        Span::raw(format!(" | battery {} | up {}", s.battery, s.uptime)),
    ];
    if let Some(at) = &s.last_updated {
        spans.push(Span::styled(
            format!(" | updated {at}"),
            Style::default().fg(MUTED),
        ));
    }
    spans.push(Span::styled("  (press 'q' to quit)", Style::default().fg(MUTED)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn draw_tabs(f: &mut ratatui::Frame<'_>, area: Rect, active: Tab) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.title()));
    let selected = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(Style::default().fg(ONLINE).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}
