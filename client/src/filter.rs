// Client-side search and date filtering over fetched rows

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{display_value, Row};

/// Loose string form of a value, used by the free-text filter
pub fn coerce(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => items.iter().map(coerce).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => display_value(other),
    }
}

/// Case-insensitive substring match over the named fields.
/// An empty term matches everything.
pub fn matches_fields(row: &Row, fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|field| {
        row.get(*field)
            .map(display_value)
            .unwrap_or_default()
            .to_lowercase()
            .contains(&needle)
    })
}

/// Case-insensitive substring match over every field of the row
pub fn matches_any_field(row: &Row, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    row.values()
        .any(|value| coerce(value).to_lowercase().contains(&needle))
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> SeaBlockResult<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| SeaBlockError::Validation(format!("Invalid date: {}", s)))
        };
        Ok(Self::new(parse(start)?, parse(end)?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the row's `created_at` falls in the range; rows without a
    /// parseable date never match.
    ///
    /// Comparison is by UTC calendar day, so the whole end day counts. A plain
    /// `created_at <= end` timestamp check would stop at midnight of the end
    /// date and drop rows saved later that day.
    pub fn contains_row(&self, row: &Row) -> bool {
        row.get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_date)
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }
}

/// Calendar date (UTC) of a backend timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
