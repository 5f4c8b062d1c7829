// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses a sales date. Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`,
/// RFC 3339 and `DD.MM.YYYY`; time-of-day is dropped.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let s = date_str.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%d.%m.%Y").ok()
}

/// True for `http://` and `https://` locations.
pub fn is_url(location: &str) -> bool {
    let lower = location.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
