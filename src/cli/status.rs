use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{db_path, get_data_dir};

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let db = db_path();

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db.display());

    if db.exists() {
        let conn = get_connection(&db)?;

        let transactions: i64 = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let bills: i64 = conn.query_row("SELECT count(*) FROM bills", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
        let balance: f64 = conn.query_row(
            "SELECT coalesce(sum(amount), 0) FROM transactions",
            [],
            |r| r.get(0),
        )?;
        let last_import: Option<String> =
            conn.query_row("SELECT max(import_date) FROM imports", [], |r| r.get(0))?;

        println!();
        println!("Transactions:  {transactions}");
        println!("Bills:         {bills}");
        println!("Imports:       {imports}");
        println!("Net flow:      {}", money(balance));
        if let Some(when) = last_import {
            println!("Last import:   {when}");
        }
    } else {
        println!();
        println!("Database not found. Run `dinero init` to set up.");
    }

    Ok(())
}
