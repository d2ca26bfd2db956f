//! Wall clock and simulated time formatting

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::SimTimePayload;

/// Day-first display format used throughout the dashboard
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y. %H:%M:%S";

/// Short format used for chart axis labels
pub const CHART_LABEL_FORMAT: &str = "%H:%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse the timestamp shapes the backend is known to emit: SQLite
/// `CURRENT_TIMESTAMP`, naive ISO 8601, and RFC 3339 with an offset
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Format a backend timestamp for display, passing unparseable text through
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None if raw.trim().is_empty() => "--".to_string(),
        None => raw.to_string(),
    }
}

/// Format a backend timestamp as a chart label
pub fn chart_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(CHART_LABEL_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Text of the header clock
pub fn format_wall_clock(now: NaiveDateTime) -> String {
    now.format(DISPLAY_FORMAT).to_string()
}

/// Resolve a `/api/sim-time` payload. Split `date`/`time` fields win over
/// `current_time` when both are present.
pub fn sim_time_from_payload(payload: &SimTimePayload) -> Option<NaiveDateTime> {
    if let (Some(date), Some(time)) = (&payload.date, &payload.time) {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok();
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S").ok();
        if let (Some(date), Some(time)) = (date, time) {
            return Some(NaiveDateTime::new(date, time));
        }
    }
    payload.current_time.as_deref().and_then(parse_timestamp)
}
