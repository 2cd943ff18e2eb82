use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::categorizer::classify_rows;
use crate::db::all_bills;
use crate::error::Result;
use crate::ledger::{self, CommitSummary};
use crate::models::{ImportRecord, ParsedRow};
use crate::reconciler::reconcile;
use crate::session::ResolutionSession;

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

pub fn parse_date_mdy(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_matches('"');
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].trim().parse().ok()?;
    let d: u32 = parts[1].trim().parse().ok()?;
    let y: i32 = parts[2].trim().parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(y, m, d).map(|dt| dt.format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// Statement layout
// ---------------------------------------------------------------------------

/// Column roles within a statement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
}

// Fixed positions of one known bank export layout, used whenever a header
// row is absent or missing a role.
impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: 0,
            description: 2,
            amount: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    /// Number of leading records to discard (junk lines plus the header).
    data_start: usize,
    columns: ColumnMap,
}

fn reader_for(text: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text)
}

fn is_header(record: &csv::StringRecord) -> bool {
    let mut has_date = false;
    let mut has_description = false;
    for field in record.iter() {
        let f = field.to_lowercase();
        if f.contains("date") {
            has_date = true;
        }
        if f.contains("description") {
            has_description = true;
        }
    }
    has_date && has_description
}

fn header_columns(record: &csv::StringRecord) -> ColumnMap {
    let mut columns = ColumnMap::default();
    let mut found = (false, false, false);
    for (i, field) in record.iter().enumerate() {
        let f = field.trim().to_lowercase();
        if !found.0 && f.contains("date") {
            columns.date = i;
            found.0 = true;
        }
        if !found.1 && f.contains("description") {
            columns.description = i;
            found.1 = true;
        }
        if !found.2 && f.contains("amount") {
            columns.amount = i;
            found.2 = true;
        }
    }
    columns
}

/// Scan records from the top for a header row (one containing both "date"
/// and "description", case-insensitive). Rows above and including the header
/// are not data; without a header every row is data at the default columns.
fn detect_layout(text: &str) -> Layout {
    let mut reader = reader_for(text.as_bytes());
    for (idx, result) in reader.records().enumerate() {
        let Ok(record) = result else { continue };
        if is_header(&record) {
            return Layout {
                data_start: idx + 1,
                columns: header_columns(&record),
            };
        }
    }
    Layout {
        data_start: 0,
        columns: ColumnMap::default(),
    }
}

// ---------------------------------------------------------------------------
// Row stream
// ---------------------------------------------------------------------------

/// Lazy, single-pass stream of raw `(date, description, amount)` field
/// tuples from statement text. Quoted commas are literal; fields arrive
/// unquoted and trimmed. Rows with fewer than 3 columns are dropped here;
/// field-level validation happens in [`normalize_row`].
pub struct RawRows<'t> {
    records: csv::StringRecordsIntoIter<&'t [u8]>,
    columns: ColumnMap,
    skip: usize,
}

impl<'t> RawRows<'t> {
    pub fn new(text: &'t str) -> Self {
        let layout = detect_layout(text);
        Self {
            records: reader_for(text.as_bytes()).into_records(),
            columns: layout.columns,
            skip: layout.data_start,
        }
    }
}

impl Iterator for RawRows<'_> {
    type Item = (String, String, String);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = self.records.next()?;
            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }
            let Ok(record) = result else { continue };
            if record.len() < 3 {
                continue;
            }
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
            return Some((
                field(self.columns.date),
                field(self.columns.description),
                field(self.columns.amount),
            ));
        }
    }
}

/// Turn a raw field tuple into a candidate row. Returns None (skip) for an
/// empty or malformed date or amount; a missing description is tolerated.
pub fn normalize_row(raw: &(String, String, String)) -> Option<ParsedRow> {
    let (date_field, description, amount_field) = raw;
    if date_field.is_empty() || amount_field.is_empty() {
        return None;
    }
    let date = parse_date_mdy(date_field)?;
    let amount = parse_amount(amount_field)?;
    Some(ParsedRow {
        date,
        description: description.trim_matches('"').trim().to_string(),
        amount,
    })
}

pub fn parse_statement(text: &str) -> Vec<ParsedRow> {
    RawRows::new(text).filter_map(|raw| normalize_row(&raw)).collect()
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Discrete outcomes of an import run, so callers can branch without
/// string-matching.
pub enum ImportOutcome<'c> {
    /// Byte-identical file was committed before; nothing parsed.
    DuplicateFile,
    /// Zero usable rows extracted from the file.
    NothingImportable,
    /// Rows parsed, but every one already matches the ledger exactly.
    NothingNew { duplicates: usize },
    /// No conflicts; the clean queue committed immediately.
    Imported { appended: usize, duplicates: usize },
    /// At least one conflict; nothing committed until the session decides.
    NeedsResolution(ResolutionSession<'c>),
}

/// Run the full pipeline against one statement file: tokenize, normalize,
/// classify, reconcile. Commits directly when there is nothing to ask the
/// user about; otherwise hands back a resolution session that holds the
/// connection until it is committed or abandoned.
pub fn import_file<'c>(conn: &'c mut Connection, file_path: &Path) -> Result<ImportOutcome<'c>> {
    let text = std::fs::read_to_string(file_path)?;

    let checksum = compute_checksum(text.as_bytes());
    if ledger::already_imported(conn, &checksum)? {
        return Ok(ImportOutcome::DuplicateFile);
    }

    let rows = parse_statement(&text);
    if rows.is_empty() {
        return Ok(ImportOutcome::NothingImportable);
    }

    let record = ImportRecord {
        filename: file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string(),
        record_count: rows.len() as i64,
        date_range_start: rows.iter().map(|r| r.date.clone()).min(),
        date_range_end: rows.iter().map(|r| r.date.clone()).max(),
        checksum,
    };

    let bills = all_bills(conn)?;
    let candidates = classify_rows(rows, &bills);
    let snapshot = ledger::all_transactions(conn)?;
    let outcome = reconcile(candidates, &snapshot);

    if outcome.conflicts.is_empty() {
        if outcome.clean.is_empty() {
            return Ok(ImportOutcome::NothingNew {
                duplicates: outcome.duplicates,
            });
        }
        let summary: CommitSummary = ledger::commit_batch(conn, &record, &outcome.clean, &[])?;
        return Ok(ImportOutcome::Imported {
            appended: summary.appended,
            duplicates: outcome.duplicates,
        });
    }

    Ok(ImportOutcome::NeedsResolution(ResolutionSession::new(
        conn, record, outcome,
    )))
}
