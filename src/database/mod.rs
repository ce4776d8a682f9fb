//INFO: Database module - durable local storage for Parley
//NOTE: Single file database for complete portability

pub mod connection;
pub mod queries;
pub mod schema;

pub use connection::Database;
pub use schema::initialize_database;
