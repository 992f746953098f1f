//! Connection requests between users.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashMap;

use crate::domain::{ConnectionRequest, ConnectionStatus};

/// Insert a request in `Sent` state, returns its ID
pub fn insert_connection_request(conn: &Connection, sender_email: &str, receiver_email: &str) -> Result<i64> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    "INSERT INTO connections (sender_email, receiver_email, status, created_at) VALUES (?1, ?2, ?3, ?4)",
    params![sender_email, receiver_email, ConnectionStatus::Sent.as_str(), now],
  )?;
  tracing::debug!("Connection request inserted: {} -> {}", sender_email, receiver_email);
  Ok(conn.last_insert_rowid())
}

pub fn has_pending_request(conn: &Connection, sender_email: &str, receiver_email: &str) -> Result<bool> {
  let count: i64 = conn.query_row(
    "SELECT COUNT(*) FROM connections WHERE sender_email = ?1 AND receiver_email = ?2 AND status = ?3",
    params![sender_email, receiver_email, ConnectionStatus::Sent.as_str()],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}

/// Incoming requests, one per sender, self-sent rows dropped.
///
/// Each sender keeps its earliest row, unless a later one is still pending:
/// a request re-sent after a rejection replaces the answered one so the
/// receiver can act on it. Senders stay in order of first contact.
pub fn get_connection_requests(conn: &Connection, receiver_email: &str) -> Result<Vec<ConnectionRequest>> {
  if receiver_email.trim().is_empty() {
    return Ok(Vec::new());
  }

  let mut stmt = conn.prepare(
    r#"
    SELECT id, sender_email, receiver_email, status, created_at
    FROM connections
    WHERE receiver_email = ?1 AND sender_email != receiver_email
    ORDER BY id
    "#,
  )?;
  let rows = stmt
    .query_map(params![receiver_email], row_to_request)?
    .collect::<Result<Vec<_>>>()?;

  let mut slot_by_sender: HashMap<String, usize> = HashMap::new();
  let mut requests: Vec<ConnectionRequest> = Vec::new();
  for row in rows {
    match slot_by_sender.get(&row.sender_email.to_lowercase()) {
      Some(&slot) => {
        if !requests[slot].is_pending() && row.is_pending() {
          requests[slot] = row;
        }
      }
      None => {
        slot_by_sender.insert(row.sender_email.to_lowercase(), requests.len());
        requests.push(row);
      }
    }
  }
  tracing::debug!("Retrieved {} connection requests for {}", requests.len(), receiver_email);
  Ok(requests)
}

/// Outgoing requests in send order
pub fn get_sent_requests(conn: &Connection, sender_email: &str) -> Result<Vec<ConnectionRequest>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, sender_email, receiver_email, status, created_at
    FROM connections
    WHERE sender_email = ?1
    ORDER BY id
    "#,
  )?;
  let requests = stmt
    .query_map(params![sender_email], row_to_request)?
    .collect::<Result<Vec<_>>>()?;
  Ok(requests)
}

pub fn get_connection(conn: &Connection, id: i64) -> Result<Option<ConnectionRequest>> {
  conn
    .query_row(
      "SELECT id, sender_email, receiver_email, status, created_at FROM connections WHERE id = ?1",
      params![id],
      row_to_request,
    )
    .optional()
}

pub fn update_connection_status(conn: &Connection, id: i64, status: ConnectionStatus) -> Result<bool> {
  let rows = conn.execute(
    "UPDATE connections SET status = ?1 WHERE id = ?2",
    params![status.as_str(), id],
  )?;
  Ok(rows > 0)
}

/// True if an accepted request exists in either direction
pub fn are_connected(conn: &Connection, a: &str, b: &str) -> Result<bool> {
  let count: i64 = conn.query_row(
    r#"
    SELECT COUNT(*) FROM connections
    WHERE status = ?3
      AND ((sender_email = ?1 AND receiver_email = ?2) OR (sender_email = ?2 AND receiver_email = ?1))
    "#,
    params![a, b, ConnectionStatus::Accepted.as_str()],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}

fn row_to_request(row: &rusqlite::Row) -> Result<ConnectionRequest> {
  let status: String = row.get(3)?;
  Ok(ConnectionRequest {
    id: row.get(0)?,
    sender_email: row.get(1)?,
    receiver_email: row.get(2)?,
    status: ConnectionStatus::from_str(&status).unwrap_or(ConnectionStatus::Sent),
    created_at: row.get(4)?,
  })
}
