//! Header-delimited input reading for author import.

use super::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::io::Read;

/// One input record keyed by column name.
pub type AuthorRecord = BTreeMap<String, String>;

/// Raw value of the name column for one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    /// One-based data row number.
    pub row: usize,
    /// `None` when the row is too short to carry the column.
    pub value: Option<String>,
}

/// Reads `column` from every CSV row of `reader`.
///
/// Input with neither header nor rows yields no rows. Rows may be shorter
/// than the header.
///
/// # Errors
/// - `MalformedInput` when the header has no `column`.
/// - `Csv` when the input cannot be decoded.
pub fn read_name_column<R: Read>(
    reader: R,
    column: &'static str,
    source_name: &str,
) -> ImportResult<Vec<NameRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = headers.iter().position(|header| header.trim() == column);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let Some(position) = position else {
            return Err(malformed(column, source_name));
        };
        rows.push(NameRow {
            row: index + 1,
            value: record.get(position).map(str::to_string),
        });
    }

    if position.is_none() && !headers.is_empty() {
        return Err(malformed(column, source_name));
    }
    Ok(rows)
}

/// Extracts `column` from already-decoded records.
///
/// # Errors
/// - `MalformedInput` when records exist and none of them has `column`.
pub fn read_name_field(
    records: &[AuthorRecord],
    column: &'static str,
    source_name: &str,
) -> ImportResult<Vec<NameRow>> {
    if !records.is_empty() && records.iter().all(|record| !record.contains_key(column)) {
        return Err(malformed(column, source_name));
    }

    Ok(records
        .iter()
        .enumerate()
        .map(|(index, record)| NameRow {
            row: index + 1,
            value: record.get(column).cloned(),
        })
        .collect())
}

fn malformed(column: &'static str, source_name: &str) -> ImportError {
    ImportError::MalformedInput {
        column,
        source_name: source_name.to_string(),
    }
}
