//! Schema for the study partner database.
//!
//! Version-gated migrations: each step checks the recorded version, runs
//! once inside a transaction and records itself in `db_version`. A fresh
//! database walks every step in order.

use chrono::Utc;
use rusqlite::{params, Connection, Result};

use crate::domain::{normalize_topics, parse_topics};

/// Current schema version. Increment when adding a migration.
pub const SCHEMA_VERSION: i32 = 3;

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS db_version (
      version INTEGER PRIMARY KEY,
      applied_at TEXT NOT NULL,
      description TEXT
    );
    "#,
  )?;

  let current_version = get_schema_version(conn)?;
  tracing::debug!("schema version: {}", current_version);

  if current_version < 1 {
    migrate_v0_to_v1(conn)?;
  }
  if current_version < 2 {
    migrate_v1_to_v2(conn)?;
  }
  if current_version < 3 {
    migrate_v2_to_v3(conn)?;
  }

  Ok(())
}

/// v0→v1: users, sessions
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v0→v1: Create users and sessions");

  let tx = conn.unchecked_transaction()?;
  tx.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      email TEXT NOT NULL UNIQUE COLLATE NOCASE,
      password_hash TEXT NOT NULL,
      first_name TEXT NOT NULL DEFAULT '',
      last_name TEXT NOT NULL DEFAULT '',
      age INTEGER,
      gender TEXT NOT NULL DEFAULT '',
      occupation TEXT NOT NULL DEFAULT '',
      preferred_study_time TEXT NOT NULL DEFAULT '',
      topics_interested TEXT NOT NULL DEFAULT '',
      study_difficulty_level TEXT NOT NULL DEFAULT '',
      setup_complete INTEGER NOT NULL DEFAULT 0,
      created_at TEXT NOT NULL,
      last_login_at TEXT
    );

    CREATE TABLE IF NOT EXISTS sessions (
      id TEXT PRIMARY KEY,
      user_id INTEGER NOT NULL,
      created_at TEXT NOT NULL,
      expires_at TEXT NOT NULL,
      last_access_at TEXT NOT NULL,
      FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
    "#,
  )?;
  record_version(&tx, 1, "Create users and sessions")?;
  tx.commit()
}

/// v1→v2: social links and connection requests
fn migrate_v1_to_v2(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v1→v2: Add social links and connections");

  let tx = conn.unchecked_transaction()?;
  add_column_if_missing(&tx, "users", "linkedin_url", "TEXT NOT NULL DEFAULT ''")?;
  add_column_if_missing(&tx, "users", "github_url", "TEXT NOT NULL DEFAULT ''")?;
  add_column_if_missing(&tx, "users", "personal_website_url", "TEXT NOT NULL DEFAULT ''")?;

  tx.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS connections (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      sender_email TEXT NOT NULL COLLATE NOCASE,
      receiver_email TEXT NOT NULL COLLATE NOCASE,
      status TEXT NOT NULL DEFAULT 'Sent',
      created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_connections_receiver ON connections(receiver_email);
    CREATE INDEX IF NOT EXISTS idx_connections_sender ON connections(sender_email);
    "#,
  )?;
  record_version(&tx, 2, "Add social links and connection requests")?;
  tx.commit()
}

/// v2→v3: move topics from the comma-joined column into `user_topics`
fn migrate_v2_to_v3(conn: &Connection) -> Result<()> {
  tracing::info!("Running migration v2→v3: Split topics into user_topics");

  let tx = conn.unchecked_transaction()?;
  tx.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS user_topics (
      user_id INTEGER NOT NULL,
      position INTEGER NOT NULL,
      topic TEXT NOT NULL,
      PRIMARY KEY (user_id, position),
      FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_user_topics_topic ON user_topics(topic);
    "#,
  )?;

  // Backfill from the legacy column
  let legacy: Vec<(i64, String)> = {
    let mut stmt = tx.prepare("SELECT id, topics_interested FROM users WHERE topics_interested != ''")?;
    stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<Result<Vec<_>>>()?
  };
  for (user_id, text) in &legacy {
    for (position, topic) in normalize_topics(parse_topics(text)).iter().enumerate() {
      tx.execute(
        "INSERT OR IGNORE INTO user_topics (user_id, position, topic) VALUES (?1, ?2, ?3)",
        params![user_id, position as i64, topic],
      )?;
    }
  }
  if !legacy.is_empty() {
    tracing::info!("Backfilled topics for {} users", legacy.len());
  }
  tx.execute_batch("ALTER TABLE users DROP COLUMN topics_interested;")?;

  record_version(&tx, 3, "Split topics into user_topics relation")?;
  tx.commit()
}

// ============================================================
// MIGRATION HELPERS
// ============================================================

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<()> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO db_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
    params![version, now, description],
  )?;
  tracing::info!("Recorded schema version {} - {}", version, description);
  Ok(())
}

/// Current schema version (0 if nothing recorded)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
  conn.query_row("SELECT COALESCE(MAX(version), 0) FROM db_version", [], |row| row.get(0))
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
