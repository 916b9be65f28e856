//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

/// Truncates a string to at most `max_len` characters, ending with `...`
/// when shortened.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats an optional id for display, `-` when unassigned.
pub fn format_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

/// Formats a stored timestamp in local time.
pub fn format_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Formats a filter's active flag.
pub fn format_status(is_active: bool, use_colors: bool) -> String {
    let label = if is_active { "on" } else { "off" };
    if !use_colors {
        return label.to_string();
    }
    if is_active {
        label.green().to_string()
    } else {
        label.dimmed().to_string()
    }
}
