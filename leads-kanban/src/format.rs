//! Display helpers for card values and timestamps

use chrono::{DateTime, Utc};

const RUPEE: char = '₹';

/// Whole-rupee amount with Indian digit grouping, e.g. `₹12,34,567`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{RUPEE}0");
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{RUPEE}{}", group_indian(&digits))
}

/// Short amount for card badges: `₹1.5Cr`, `₹12.3L`, `₹45K`, `₹950`
pub fn format_compact_currency(value: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(10_000_000.0, "Cr"), (100_000.0, "L"), (1_000.0, "K")];

    if !value.is_finite() {
        return format!("{RUPEE}0");
    }
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    let Some(pos) = UNITS.iter().position(|(size, _)| abs >= *size) else {
        return format_currency(value);
    };

    let (mut size, mut suffix) = UNITS[pos];
    let mut scaled = round_tenth(abs / size);
    // Rounding can carry into the next unit: 99,990 is ₹1L, not ₹100K
    if pos > 0 && scaled * size >= UNITS[pos - 1].0 {
        (size, suffix) = UNITS[pos - 1];
        scaled = round_tenth(abs / size);
    }
    let number = format!("{scaled:.1}");
    let number = number.strip_suffix(".0").unwrap_or(&number);
    format!("{sign}{RUPEE}{number}{suffix}")
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, g) = rest.split_at(rest.len() - 2);
        groups.push(g);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Age of a timestamp relative to `now`: `just now`, `5m ago`, `3h ago`,
/// `2d ago`, then the calendar date once a week has passed.
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(ts);
    if delta.num_minutes() < 1 {
        "just now".to_string()
    } else if delta.num_hours() < 1 {
        format!("{}m ago", delta.num_minutes())
    } else if delta.num_days() < 1 {
        format!("{}h ago", delta.num_hours())
    } else if delta.num_days() < 7 {
        format!("{}d ago", delta.num_days())
    } else {
        ts.format("%-d %b %Y").to_string()
    }
}
