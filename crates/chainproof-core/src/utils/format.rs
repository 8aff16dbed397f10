use chrono::{DateTime, Utc};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Convert a ledger timestamp (nanoseconds since the Unix epoch) to UTC
pub fn nanos_to_datetime(nanos: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(nanos / NANOS_PER_SEC).ok()?;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, subsec)
}

/// Format a ledger timestamp for display, e.g. "Mar 04, 2024"
pub fn format_timestamp(nanos: u64) -> String {
    match nanos_to_datetime(nanos) {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Format an optional score with one decimal, or a dash
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{:.1}", value),
        None => "-".to_string(),
    }
}
