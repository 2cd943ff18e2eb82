use comfy_table::{Cell, Table};

use crate::db::{all_bills, get_connection};
use crate::error::{DineroError, Result};
use crate::fmt::money;
use crate::settings::db_path;

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let bills = all_bills(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Amount", "Due Day"]);
    for bill in &bills {
        table.add_row(vec![
            Cell::new(bill.id),
            Cell::new(&bill.name),
            Cell::new(money(bill.amount)),
            Cell::new(bill.due_day),
        ]);
    }
    println!("Bills\n{table}");
    Ok(())
}

pub fn add(name: &str, amount: f64, day: u32) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(DineroError::Other(format!(
            "Due day must be 1-31, got {day}"
        )));
    }
    let conn = get_connection(&db_path())?;
    conn.execute(
        "INSERT INTO bills (name, amount, due_day) VALUES (?1, ?2, ?3)",
        rusqlite::params![name.trim(), amount, day],
    )?;
    println!("Added bill: {name}");
    Ok(())
}

pub fn rm(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let changed = conn.execute("DELETE FROM bills WHERE id = ?1", [id])?;
    if changed > 0 {
        println!("Removed bill {id}");
    } else {
        println!("No bill with id {id}");
    }
    Ok(())
}
