//! CPU / memory / disk gauges.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use crate::screen::{GaugeView, StatsView};

fn gauge<'a>(title: &'a str, g: Option<&GaugeView>, color: Color) -> Gauge<'a> {
    let (ratio, label) = g.map_or((0.0, "--".to_string()), |g| (g.ratio, g.label.clone()));
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label)
}

pub fn draw_stats(f: &mut ratatui::Frame<'_>, area: Rect, stats: Option<&StatsView>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    f.render_widget(gauge("CPU", stats.map(|s| &s.cpu), Color::Cyan), cols[0]);
    f.render_widget(
        gauge("Memory", stats.map(|s| &s.memory), Color::Magenta),
        cols[1],
    );
    f.render_widget(gauge("Disk", stats.map(|s| &s.disk), Color::Yellow), cols[2]);
}
