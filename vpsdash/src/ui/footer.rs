//! Bottom line: the active prompt, else the current notification, else key hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::command::Tab;
use crate::notifier::Toast;
use crate::screen::TaskForm;
use crate::ui::theme::{priority_color, severity_color, MUTED};

pub enum Prompt<'a> {
    AddTask(&'a TaskForm),
    AddDownload(&'a str),
    Confirm(&'a str),
}

fn hints(tab: Tab) -> &'static str {
    match tab {
        Tab::Dashboard => "↑/↓ select  s start/stop  R restart  r refresh  1-3/Tab switch  q quit",
        Tab::Tasks => "↑/↓ select  space toggle  a add  d delete  f filter  r refresh  q quit",
        Tab::Downloads => "↑/↓ select  a add URL  o save  d delete  r refresh  q quit",
    }
}

pub fn draw_footer(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    tab: Tab,
    prompt: Option<Prompt<'_>>,
    toast: Option<&Toast>,
) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = match prompt {
        Some(Prompt::AddTask(form)) => Line::from(vec![
            Span::styled("New task: ", bold),
            Span::raw(format!("{}_", form.title)),
            Span::raw("  priority "),
            Span::styled(
                form.priority.as_str(),
                Style::default().fg(priority_color(form.priority)),
            ),
            Span::raw(format!("  category {}", form.category())),
            Span::styled(
                "  (Tab priority, ↑/↓ category, Enter add, Esc cancel)",
                Style::default().fg(MUTED),
            ),
        ]),
        Some(Prompt::AddDownload(url)) => Line::from(vec![
            Span::styled("Download URL: ", bold),
            Span::raw(format!("{url}_")),
            Span::styled("  (Enter start, Esc cancel)", Style::default().fg(MUTED)),
        ]),
        Some(Prompt::Confirm(what)) => Line::from(Span::styled(format!("Delete {what}? (y/N)"), bold)),
        None => match toast {
            Some(t) => Line::from(Span::styled(
                t.message.as_str(),
                Style::default().fg(severity_color(t.severity)),
            )),
            None => Line::from(Span::styled(hints(tab), Style::default().fg(MUTED))),
        },
    };
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::TOP)),
        area,
    );
}
