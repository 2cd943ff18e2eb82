use rusqlite::{Connection, Row};

use crate::error::Result;
use crate::models::{Category, ImportRecord, Transaction};

/// Counts reported back to the caller after a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub appended: usize,
    pub replaced: usize,
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let label: String = row.get(4)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        // Stored labels come from Category::label; anything else degrades.
        category: Category::from_label(&label).unwrap_or(Category::Other),
    })
}

pub fn all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, amount, category FROM transactions ORDER BY date, id",
    )?;
    let rows = stmt
        .query_map([], |row| row_to_transaction(row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (date, description, amount, category) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![txn.date, txn.description, txn.amount, txn.category.label()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite an existing entry's fields while keeping its identifier.
pub fn replace_by_id(conn: &Connection, id: i64, txn: &Transaction) -> Result<()> {
    conn.execute(
        "UPDATE transactions SET date = ?1, description = ?2, amount = ?3, category = ?4 WHERE id = ?5",
        rusqlite::params![txn.date, txn.description, txn.amount, txn.category.label(), id],
    )?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    let changed = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

/// Apply an import's mutations as one logical batch: every append, every
/// replacement, and the import-history row commit together or not at all.
pub fn commit_batch(
    conn: &mut Connection,
    record: &ImportRecord,
    appends: &[Transaction],
    replacements: &[(i64, Transaction)],
) -> Result<CommitSummary> {
    let tx = conn.transaction()?;

    for txn in appends {
        insert_transaction(&tx, txn)?;
    }
    for (id, txn) in replacements {
        replace_by_id(&tx, *id, txn)?;
    }
    tx.execute(
        "INSERT INTO imports (filename, record_count, date_range_start, date_range_end, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            record.filename,
            record.record_count,
            record.date_range_start,
            record.date_range_end,
            record.checksum,
        ],
    )?;

    tx.commit()?;
    Ok(CommitSummary {
        appended: appends.len(),
        replaced: replacements.len(),
    })
}

pub fn already_imported(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}
