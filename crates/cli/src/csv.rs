use anyhow::{bail, Context, Result};
use solitaire_hierarchy::find_header;
use std::fs;
use std::path::Path;

/// A tokenized CSV file: trimmed headers plus raw data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Tokenize CSV text. The first non-blank line is the header row.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text).into_iter();
        let headers = records
            .next()
            .map(|row| row.into_iter().map(|h| h.trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            headers,
            rows: records.collect(),
        }
    }

    /// Read and tokenize a CSV file; fails on empty input or a missing required column
    pub fn read(path: &Path, required: &[&str]) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;

        let table = Self::parse(&text);
        if table.headers.is_empty() {
            bail!("{} is empty", path.display());
        }
        for column in required {
            if find_header(&table.headers, column).is_none() {
                bail!("{} has no '{}' column", path.display(), column.trim());
            }
        }

        log::debug!(
            "Read {}: {} columns, {} rows",
            path.display(),
            table.headers.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

/// Split CSV text into records. Quoted fields may hold commas, newlines and
/// `""` escapes; CR, LF and CRLF all end a record; blank lines are skipped.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut field);
            }
            _ => field.push(c),
        }
    }
    end_record(&mut records, &mut record, &mut field);

    records
}

fn end_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    let row = std::mem::take(record);
    if row.iter().all(|cell| cell.trim().is_empty()) {
        return;
    }
    records.push(row);
}
