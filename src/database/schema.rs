//INFO: Database schema definitions and initialization for Parley
//NOTE: Tables are created here on first run

use anyhow::{Context, Result};
use rusqlite::Connection;

//INFO: Initializes all database tables if they don't exist
pub fn initialize_database(connection: &Connection) -> Result<()> {
    //INFO: Create local_storage table - key-value store standing in for browser localStorage
    //NOTE: One row per key, so a write always replaces the previous value
    connection
        .execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
            [],
        )
        .context("Failed to create local_storage table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_database(&connection).unwrap();
        initialize_database(&connection).unwrap();

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'local_storage'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
