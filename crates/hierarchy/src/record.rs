use crate::aggregate::find_header;
use crate::config::ColumnConfig;
use crate::tokens::clean_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One active CSV row: column name → trimmed value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value of a column, `None` when the column is absent
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of a column, empty when absent
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// Display name: first non-blank of the name column and its fallbacks,
    /// whitespace collapsed; `unknown_name` when all are blank.
    pub fn display_name(&self, columns: &ColumnConfig) -> String {
        std::iter::once(&columns.name)
            .chain(columns.fallback_names.iter())
            .map(|column| clean_name(self.value(column)))
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| columns.unknown_name.clone())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Zip headers with each row and drop inactive rows.
///
/// Missing trailing cells become empty strings and surplus cells are ignored.
/// The status header is matched ignoring case and padding, the way the CSV
/// reader checks for it. A row is dropped only when its status equals the
/// configured inactive value (case-insensitive); rows without a status are kept.
pub fn normalize_records(
    headers: &[String],
    rows: &[Vec<String>],
    columns: &ColumnConfig,
) -> Vec<Record> {
    let status = find_header(headers, &columns.status).unwrap_or(columns.status.trim());
    let headers: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    let inactive = columns.inactive_status.trim().to_lowercase();

    let records: Vec<Record> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = row.get(idx).map(|cell| cell.trim()).unwrap_or("");
                    (header.to_string(), value.to_string())
                })
                .collect::<Record>()
        })
        .filter(|record| record.value(status).to_lowercase() != inactive)
        .collect();

    log::debug!(
        "Normalized {} of {} rows ({} inactive dropped)",
        records.len(),
        rows.len(),
        rows.len() - records.len()
    );

    records
}
