use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is valid"));

/// Human-friendly distance between `created_at` and `now`, e.g. "3 hours ago".
pub fn format_relative(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(created_at);
    let (amount, unit) = if delta.num_seconds() < 45 {
        return if delta.num_seconds() < 0 {
            "in the future".to_string()
        } else {
            "less than a minute ago".to_string()
        };
    } else if delta.num_minutes() < 60 {
        (delta.num_minutes().max(1), "minute")
    } else if delta.num_hours() < 24 {
        (delta.num_hours(), "hour")
    } else if delta.num_days() < 30 {
        (delta.num_days(), "day")
    } else if delta.num_days() < 365 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

/// Strips HTML tags and cuts the text to `max_len` characters.
pub fn truncate_body(body: &str, max_len: usize) -> String {
    let text = HTML_TAG.replace_all(body, "");
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len).collect();
        format!("{}...", cut)
    } else {
        text.into_owned()
    }
}
