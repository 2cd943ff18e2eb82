use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::Bill;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL DEFAULT 'Other',
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS bills (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    amount REAL NOT NULL,
    due_day INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT,
    checksum TEXT
);
";

// Stock bill list seeded on first init: (name, amount, due day of month).
const DEFAULT_BILLS: &[(&str, f64, u32)] = &[
    ("Flex Rent", 500.00, 1),
    ("Student Loans", 153.83, 5),
    ("2nd Credit Card", 45.00, 5),
    ("Farmers Insurance", 224.00, 7),
    ("Car Loan", 169.32, 11),
    ("YouTube Premium", 24.54, 12),
    ("Disney Bundle", 20.27, 12),
    ("Tio Frank", 787.50, 15),
    ("Flex Finance", 400.00, 15),
    ("Piedmont Health", 47.45, 22),
    ("Disney+", 6.43, 28),
    ("Google Store", 25.00, 28),
    ("Chase Credit Card", 75.00, 28),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM bills", [], |row| row.get(0))?;
    if count == 0 {
        for bill in DEFAULT_BILLS {
            conn.execute(
                "INSERT INTO bills (name, amount, due_day) VALUES (?1, ?2, ?3)",
                rusqlite::params![bill.0, bill.1, bill.2],
            )?;
        }
    }
    Ok(())
}

pub fn all_bills(conn: &Connection) -> Result<Vec<Bill>> {
    let mut stmt = conn.prepare("SELECT id, name, amount, due_day FROM bills ORDER BY due_day, name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Bill {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                due_day: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["transactions", "bills", "imports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_seeds_bills_once() {
        let (_dir, conn) = test_db();
        let count: i64 = conn.query_row("SELECT count(*) FROM bills", [], |r| r.get(0)).unwrap();
        assert_eq!(count, DEFAULT_BILLS.len() as i64);

        // Re-running init must not duplicate the seed rows.
        init_db(&conn).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM bills", [], |r| r.get(0)).unwrap();
        assert_eq!(count, DEFAULT_BILLS.len() as i64);
    }

    #[test]
    fn test_all_bills_ordered_by_due_day() {
        let (_dir, conn) = test_db();
        let bills = all_bills(&conn).unwrap();
        assert_eq!(bills.first().map(|b| b.name.as_str()), Some("Flex Rent"));
        assert!(bills.windows(2).all(|w| w[0].due_day <= w[1].due_day));
    }
}
