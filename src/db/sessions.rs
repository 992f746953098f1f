use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

/// Create a new session
pub fn create_session(
  conn: &Connection,
  user_id: i64,
  session_id: &str,
  duration_hours: i64,
) -> Result<()> {
  let now = Utc::now();
  let expires = now + Duration::hours(duration_hours);
  conn.execute(
    "INSERT INTO sessions (id, user_id, created_at, expires_at, last_access_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      session_id,
      user_id,
      now.to_rfc3339(),
      expires.to_rfc3339(),
      now.to_rfc3339()
    ],
  )?;
  Ok(())
}

/// Validate session and get user info, returns (user_id, email)
pub fn get_session_user(conn: &Connection, session_id: &str) -> Result<Option<(i64, String)>> {
  let now = Utc::now().to_rfc3339();
  let user = conn
    .query_row(
      r#"
      SELECT u.id, u.email
      FROM sessions s
      JOIN users u ON s.user_id = u.id
      WHERE s.id = ?1 AND s.expires_at > ?2
      "#,
      params![session_id, now],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?;

  if user.is_some() {
    if let Err(e) = conn.execute(
      "UPDATE sessions SET last_access_at = ?1 WHERE id = ?2",
      params![now, session_id],
    ) {
      tracing::warn!("Failed to touch session: {}", e);
    }
  }
  Ok(user)
}

/// Delete a session (logout)
pub fn delete_session(conn: &Connection, session_id: &str) -> Result<()> {
  conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;
  Ok(())
}

/// Delete all sessions for a user
pub fn delete_user_sessions(conn: &Connection, user_id: i64) -> Result<usize> {
  conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])
}

/// Returns count of deleted sessions
pub fn cleanup_expired_sessions(conn: &Connection) -> Result<usize> {
  let now = Utc::now().to_rfc3339();
  conn.execute("DELETE FROM sessions WHERE expires_at < ?1", params![now])
}
