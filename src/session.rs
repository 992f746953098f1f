//! Session identifiers and housekeeping.
//!
//! Sessions themselves live in the `sessions` table (see `db::sessions`).
//! Expired rows are swept opportunistically while validating requests.

use rusqlite::Connection;

use crate::config;
use crate::db;

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

/// Clean up expired sessions occasionally (~10% chance)
pub fn maybe_cleanup_expired(conn: &Connection) {
  if rand::random::<u8>() >= config::SESSION_CLEANUP_THRESHOLD {
    return;
  }
  match db::cleanup_expired_sessions(conn) {
    Ok(0) => {}
    Ok(n) => tracing::debug!("Removed {} expired sessions", n),
    Err(e) => tracing::warn!("Failed to clean up expired sessions: {}", e),
  }
}
