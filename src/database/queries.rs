//INFO: Database query functions for Parley
//NOTE: Whole-value get/set/remove on the local_storage table

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

// ============================================================================
// Local Storage Queries
// ============================================================================

//INFO: Gets a stored value by key
pub fn get_item(connection: &Connection, key: &str) -> Result<Option<String>> {
    let result: Option<String> = connection
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to query local storage")?;

    Ok(result)
}

//INFO: Stores a value, replacing whatever was under the key before
pub fn set_item(connection: &Connection, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    connection
        .execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )
        .context("Failed to write local storage")?;
    Ok(())
}

//INFO: Removes a stored value
//NOTE: Removing a missing key affects zero rows and is not an error
pub fn remove_item(connection: &Connection, key: &str) -> Result<()> {
    connection
        .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
        .context("Failed to remove local storage item")?;
    Ok(())
}
