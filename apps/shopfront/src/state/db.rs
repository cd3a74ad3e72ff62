//! # Database State
//!
//! Thin wrapper around the cellshop-db `Database` handle.
//!
//! The pool inside `Database` is already thread-safe, so no additional
//! locking is needed here; the wrapper exists so command signatures name
//! a shopfront state type rather than a db-crate type.

use cellshop_db::Database;

/// Database state for shopfront commands.
#[derive(Debug, Clone)]
pub struct DbState {
    database: Database,
}

impl DbState {
    /// Wraps a connected database.
    pub fn new(database: Database) -> Self {
        DbState { database }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }
}
