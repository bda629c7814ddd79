//! Small UI helpers: human-readable sizes, truncation, labels, colors.

use ratatui::style::Color;

/// Binary-scaled size with at most two decimals, trailing zeros dropped ("1.5 KB").
pub fn format_bytes(b: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if b == 0 {
        return "0 B".into();
    }
    let mut v = b as f64;
    let mut i = 0;
    while v >= 1024.0 && i < UNITS.len() - 1 {
        v /= 1024.0;
        i += 1;
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s} {}", UNITS[i])
}

/// Whole-number percentage as shown next to a gauge.
pub fn percent_label(v: f64) -> String {
    format!("{}%", v.round() as i64)
}

pub fn truncate_end(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Short label for the known service ids.
pub fn service_label(id: &str) -> &'static str {
    match id {
        "ssh" => "SSH",
        "nginx" => "NGINX",
        "mariadb" => "MariaDB",
        "postgresql" => "PostgreSQL",
        "redis" => "Redis",
        "filebrowser" => "Files",
        _ => "Service",
    }
}

/// `#rrggbb` to a terminal color.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_scale_like_the_web_ui() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 1024 * 1024 / 4), "5.25 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }

    #[test]
    fn percentages_round_to_whole_numbers() {
        assert_eq!(percent_label(42.7), "43%");
        assert_eq!(percent_label(0.4), "0%");
        assert_eq!(percent_label(99.5), "100%");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_end("https://example.com/file.iso", 12), "https://e...");
        assert_eq!(truncate_end("ééééééé", 4), "é...");
        assert_eq!(truncate_end("short", 10), "short");
    }

    #[test]
    fn labels_and_colors() {
        assert_eq!(service_label("filebrowser"), "Files");
        assert_eq!(service_label("mystery"), "Service");
        assert_eq!(parse_hex_color("#3b82f6"), Some(Color::Rgb(0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex_color("3b82f6"), None);
        assert_eq!(parse_hex_color("#zz0000"), None);
    }
}
