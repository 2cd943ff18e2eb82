use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::{DineroError, Result};
use crate::fmt::money;
use crate::ledger::{delete_transaction, insert_transaction};
use crate::models::{Category, Transaction};
use crate::settings::db_path;

pub fn list(month: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;

    let (sql, param): (&str, Option<String>) = match month {
        Some(m) => (
            "SELECT id, date, description, amount, category FROM transactions \
             WHERE date LIKE ?1 ORDER BY date, id",
            Some(format!("{m}%")),
        ),
        None => (
            "SELECT id, date, description, amount, category FROM transactions ORDER BY date, id",
            None,
        ),
    };

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<(i64, String, String, f64, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    let mut stmt = conn.prepare(sql)?;
    let rows: Vec<(i64, String, String, f64, String)> = match &param {
        Some(p) => stmt.query_map([p], map_row)?.collect::<std::result::Result<_, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<std::result::Result<_, _>>()?,
    };

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount", "Category"]);
    for (id, date, description, amount, category) in &rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(date),
            Cell::new(description),
            Cell::new(money(*amount)),
            Cell::new(category),
        ]);
    }
    println!("Transactions ({})\n{table}", rows.len());
    Ok(())
}

pub fn add(date: &str, description: &str, amount: f64, category: Option<&str>) -> Result<()> {
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(DineroError::Other(format!(
            "Invalid date '{date}' (expected YYYY-MM-DD)"
        )));
    }
    let category = match category {
        Some(label) => Category::from_label(label)
            .ok_or_else(|| DineroError::UnknownCategory(label.to_string()))?,
        None => Category::Other,
    };

    let conn = get_connection(&db_path())?;
    let id = insert_transaction(
        &conn,
        &Transaction {
            id: None,
            date: date.to_string(),
            description: description.trim().to_string(),
            amount,
            category,
        },
    )?;
    println!("Added transaction {id}: {description} ({category})");
    Ok(())
}

pub fn rm(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    if delete_transaction(&conn, id)? {
        println!("Removed transaction {id}");
    } else {
        println!("No transaction with id {id}");
    }
    Ok(())
}
