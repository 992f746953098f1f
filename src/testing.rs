//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the schema.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::domain::User;

/// File-backed database in a temporary directory, removed on drop.
pub struct TestEnv {
    /// Kept alive so the database file outlives the connection
    pub temp: TempDir,
    /// Connection with every migration applied
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("study_partner.db"))?;
        crate::db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Insert a user with the given topics and return the stored record.
    pub fn seed_user(&self, email: &str, topics: &[&str]) -> rusqlite::Result<User> {
        crate::db::create_user(&self.conn, email, "hash")?;
        crate::db::set_topics(&self.conn, email, topics)?;
        crate::db::get_user_by_email(&self.conn, email)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
    }
}
