//! Services grid: one row per service with its status and available actions.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::screen::ServiceCard;
use crate::ui::theme::{MUTED, OFFLINE, ONLINE, SELECTED_BG};

pub fn draw_services(f: &mut ratatui::Frame<'_>, area: Rect, cards: &[ServiceCard], selected: usize) {
    let header = Row::new(["", "Name", "Status", "Port", "Actions"])
        .style(Style::default().fg(MUTED).add_modifier(Modifier::BOLD));

    let rows = cards.iter().map(|c| {
        let color = if c.running { ONLINE } else { OFFLINE };
        Row::new(vec![
            Cell::from(c.label).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(c.name.as_str()),
            Cell::from(format!("● {}", c.status)).style(Style::default().fg(color)),
            Cell::from(c.port.as_str()),
            Cell::from(format!("[s] {}  [R] Restart", c.primary_label())),
        ])
    });

    let widths = [
        Constraint::Length(11),
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(22),
    ];
    let title = if cards.is_empty() {
        "Services (none reported)"
    } else {
        "Services"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(SELECTED_BG))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !cards.is_empty() {
        state.select(Some(selected.min(cards.len() - 1)));
    }
    f.render_stateful_widget(table, area, &mut state);
}
