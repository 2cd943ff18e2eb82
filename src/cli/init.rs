use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{get_data_dir, save_settings, shellexpand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let dir = match data_dir {
        Some(d) => PathBuf::from(shellexpand_path(&d)),
        None => get_data_dir(),
    };
    std::fs::create_dir_all(&dir)?;

    // When DINERO_DATA_DIR pins the location, leave the user's settings alone.
    if std::env::var("DINERO_DATA_DIR").is_err() {
        save_settings(&Settings {
            data_dir: dir.to_string_lossy().to_string(),
        })?;
    }

    let conn = get_connection(&dir.join("dinero.db"))?;
    init_db(&conn)?;

    println!("Initialized {}", dir.display());
    println!("Run `dinero import <statement.csv>` to bring in transactions.");
    Ok(())
}
