//INFO: Database connection management for Parley
//NOTE: Uses SQLite with a single portable file stored in the data directory

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

use super::schema::initialize_database;

//INFO: Thread-safe database wrapper
//NOTE: Wrapped in Mutex so the gateway and the CLI can share one handle
pub struct Database {
    pub connection: Mutex<Connection>,
}

impl Database {
    //INFO: Opens (or creates) the database file inside the given data directory
    //NOTE: Creates the directory if needed and makes sure the schema exists
    pub fn open(data_directory: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_directory).context("Failed to create data directory")?;

        let database_path = data_directory.join("parley.db");

        let connection =
            Connection::open(&database_path).context("Failed to open database connection")?;

        initialize_database(&connection).context("Failed to initialize database schema")?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}
