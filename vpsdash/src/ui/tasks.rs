//! Task list with filter/summary line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::screen::TaskRow;
use crate::types::TaskFilter;
use crate::ui::theme::{priority_color, MUTED, SELECTED_BG};
use crate::ui::util::parse_hex_color;

fn task_item(t: &TaskRow) -> ListItem<'_> {
    let check = if t.completed { "[x] " } else { "[ ] " };
    let title_style = if t.completed {
        Style::default()
            .fg(MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    let category_color = t
        .category_color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(MUTED);

    let mut lines = vec![Line::from(vec![
        Span::raw(check),
        Span::styled(t.title.as_str(), title_style),
        Span::raw("  "),
        Span::styled(t.category.as_str(), Style::default().fg(category_color)),
        Span::raw(" "),
        Span::styled(
            t.priority.as_str().to_uppercase(),
            Style::default().fg(priority_color(t.priority)),
        ),
    ])];
    if let Some(desc) = &t.description {
        lines.push(Line::from(Span::styled(
            format!("    {desc}"),
            Style::default().fg(MUTED),
        )));
    }
    ListItem::new(lines)
}

pub fn draw_tasks(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    tasks: &[TaskRow],
    filter: TaskFilter,
    summary: Option<&str>,
    selected: usize,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let line = Line::from(vec![
        Span::styled(
            format!("filter: {}", filter.as_str()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {}", summary.unwrap_or("")),
            Style::default().fg(MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(line), rows[0]);

    let block = Block::default().borders(Borders::ALL).title("Tasks");
    if tasks.is_empty() {
        f.render_widget(
            Paragraph::new("No tasks yet. Press 'a' to add one.")
                .style(Style::default().fg(MUTED))
                .block(block),
            rows[1],
        );
        return;
    }

    let list = List::new(tasks.iter().map(task_item))
        .block(block)
        .highlight_style(Style::default().bg(SELECTED_BG))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected.min(tasks.len() - 1)));
    f.render_stateful_widget(list, rows[1], &mut state);
}
