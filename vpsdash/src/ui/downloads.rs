//! Download jobs with status badge, progress bar and size or error.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::screen::DownloadRow;
use crate::types::DownloadStatus;
use crate::ui::theme::{download_color, MUTED, SELECTED_BG};

const BAR_WIDTH: usize = 24;

fn bar(progress: u8) -> String {
    let filled = (progress.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn download_item(d: &DownloadRow) -> ListItem<'_> {
    let color = download_color(d.status);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", d.status.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(d.filename.as_str()),
        ]),
        Line::from(Span::styled(
            format!("    {}", d.url),
            Style::default().fg(MUTED),
        )),
    ];
    match d.status {
        DownloadStatus::Downloading => lines.push(Line::from(vec![
            Span::styled(format!("    {} ", bar(d.progress)), Style::default().fg(color)),
            Span::raw(d.detail.as_str()),
        ])),
        DownloadStatus::Completed => lines.push(Line::from(format!(
            "    {}  [o] save",
            d.detail
        ))),
        DownloadStatus::Failed => lines.push(Line::from(Span::styled(
            format!("    {}", d.detail),
            Style::default().fg(color),
        ))),
        DownloadStatus::Queued => {}
    }
    ListItem::new(lines)
}

pub fn draw_downloads(f: &mut ratatui::Frame<'_>, area: Rect, rows: &[DownloadRow], selected: usize) {
    let block = Block::default().borders(Borders::ALL).title("Downloads");
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No downloads. Press 'a' to queue a URL.")
                .style(Style::default().fg(MUTED))
                .block(block),
            area,
        );
        return;
    }
    let list = List::new(rows.iter().map(download_item))
        .block(block)
        .highlight_style(Style::default().bg(SELECTED_BG))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected.min(rows.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 12);
        assert_eq!(bar(100).chars().filter(|c| *c == '░').count(), 0);
        assert_eq!(bar(250).chars().count(), BAR_WIDTH);
    }
}
