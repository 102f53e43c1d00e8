//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::theme::{styled, styles};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Render a stored `created_at` for display.
///
/// Pretty output uses minutes in the configured timezone (UTC when none).
/// Plain output keeps the stored RFC 3339 string untouched. Unparseable
/// values are shown as-is.
pub fn display_timestamp(created_at: &str, timezone: Option<Tz>, pretty: bool) -> String {
    if !pretty {
        return created_at.to_string();
    }
    let Ok(parsed) = DateTime::parse_from_rfc3339(created_at) else {
        return created_at.to_string();
    };
    let utc = parsed.with_timezone(&Utc);
    match timezone {
        Some(tz) => utc
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M %Z")
            .to_string(),
        None => utc.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Highlight case-insensitive occurrences of `query` in `text`.
pub fn highlight_matches(text: &str, query: &str, color: bool) -> String {
    if !color || query.is_empty() {
        return text.to_string();
    }
    // Offsets found in the lowercased copy index `text` only when every
    // char keeps its UTF-8 length; otherwise skip highlighting.
    if !lowercases_in_place(text) || !lowercases_in_place(query) {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_query = query.to_lowercase();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(offset) = lower_text[cursor..].find(&lower_query) {
        let start = cursor + offset;
        let end = start + lower_query.len();
        out.push_str(&text[cursor..start]);
        out.push_str(&styled(&text[start..end], styles::highlight(), true));
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn lowercases_in_place(text: &str) -> bool {
    text.chars().all(|c| {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(single), None) => single.len_utf8() == c.len_utf8(),
            _ => false,
        }
    })
}
