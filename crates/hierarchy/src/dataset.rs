use crate::aggregate::find_header;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Column holding the per-row modification date
pub const LAST_UPDATE_COLUMN: &str = "Last Update";

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Summary of one CSV load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Data rows (header excluded)
    pub rows: usize,

    /// Records left after dropping inactive rows
    pub active_records: usize,

    /// Latest parseable `Last Update` value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDateTime>,
}

impl DatasetInfo {
    pub fn new(headers: &[String], rows: &[Vec<String>], active_records: usize) -> Self {
        Self {
            rows: rows.len(),
            active_records,
            last_update: latest_update(headers, rows),
        }
    }

    /// Identifies a dataset by size and freshness: `people:<n>|lu:<date or n/a>`
    pub fn version(&self) -> String {
        let last_update = self
            .last_update
            .map(|ts| ts.date().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "n/a".to_string());
        format!("people:{}|lu:{}", self.active_records, last_update)
    }
}

/// Parse a date cell; `None` for anything unrecognised
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn latest_update(headers: &[String], rows: &[Vec<String>]) -> Option<NaiveDateTime> {
    let column = find_header(headers, LAST_UPDATE_COLUMN)?;
    let index = headers.iter().position(|h| h.trim() == column)?;
    rows.iter()
        .filter_map(|row| row.get(index))
        .filter_map(|cell| parse_date(cell))
        .max()
}
