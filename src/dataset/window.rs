//! Time-window parsing and row selection
//!
//! Request dates arrive as strings in a handful of common formats. They are
//! normalized to UTC before any comparison; a string without a timezone
//! indicator is assumed to already be UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use polars::prelude::*;

use crate::error::{Result, ServiceError};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a date string into a UTC instant.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` with or without an offset,
/// and a bare `YYYY-MM-DD` (midnight). Fails with `InvalidTimeRange` when no
/// format matches.
pub fn parse_utc(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ServiceError::InvalidTimeRange(format!(
        "unrecognized date format: {input}"
    )))
}

/// A closed time interval `[start, end]`, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse both bounds from date strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_utc(start)?,
            end: parse_utc(end)?,
        })
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }

    /// Indices of the rows whose timestamp falls inside the window, in
    /// original order. Rows with an unparseable timestamp never match.
    /// An empty result is not an error at this layer; the caller decides
    /// whether that is fatal.
    pub fn select(&self, timestamps: &[Option<DateTime<Utc>>]) -> Vec<usize> {
        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| match ts {
                Some(t) if self.contains(*t) => Some(i),
                _ => None,
            })
            .collect()
    }
}

/// Parse a string timestamp column into UTC instants, one per row.
pub fn column_timestamps(df: &DataFrame, column: &str) -> Result<Vec<Option<DateTime<Utc>>>> {
    let col = df
        .column(column)
        .map_err(|_| ServiceError::Data(format!("timestamp column '{column}' not found")))?;
    let ca = col
        .str()
        .map_err(|e| ServiceError::Data(e.to_string()))?;

    Ok(ca
        .into_iter()
        .map(|v| v.and_then(|s| parse_utc(s).ok()))
        .collect())
}
