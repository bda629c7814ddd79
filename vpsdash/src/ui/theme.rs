//! Shared UI theme constants.

use ratatui::style::Color;

use crate::notifier::Severity;
use crate::types::{DownloadStatus, Priority};

pub const ONLINE: Color = Color::Rgb(16, 185, 129);
pub const OFFLINE: Color = Color::Rgb(239, 68, 68);
pub const MUTED: Color = Color::Rgb(170, 170, 180);
pub const SELECTED_BG: Color = Color::Rgb(50, 50, 60);

pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Low => Color::Rgb(16, 185, 129),
        Priority::Medium => Color::Rgb(245, 158, 11),
        Priority::High => Color::Rgb(239, 68, 68),
    }
}

pub fn download_color(s: DownloadStatus) -> Color {
    match s {
        DownloadStatus::Queued => Color::Rgb(107, 114, 128),
        DownloadStatus::Downloading => Color::Rgb(59, 130, 246),
        DownloadStatus::Completed => Color::Rgb(16, 185, 129),
        DownloadStatus::Failed => Color::Rgb(239, 68, 68),
    }
}

pub fn severity_color(s: Severity) -> Color {
    match s {
        Severity::Info => Color::Rgb(59, 130, 246),
        Severity::Success => ONLINE,
        Severity::Error => OFFLINE,
    }
}
