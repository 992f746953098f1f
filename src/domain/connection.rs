use serde::{Deserialize, Serialize};

/// State of a connection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
  Sent,
  Accepted,
  Rejected,
}

impl ConnectionStatus {
  /// Case-insensitive; "pending" is an alias for `Sent`
  pub fn from_str(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "sent" | "pending" => Some(Self::Sent),
      "accepted" => Some(Self::Accepted),
      "rejected" => Some(Self::Rejected),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sent => "Sent",
      Self::Accepted => "Accepted",
      Self::Rejected => "Rejected",
    }
  }
}

/// A one-way "like" from sender to receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRequest {
  pub id: i64,
  pub sender_email: String,
  pub receiver_email: String,
  pub status: ConnectionStatus,
  pub created_at: String,
}

impl ConnectionRequest {
  pub fn is_pending(&self) -> bool {
    self.status == ConnectionStatus::Sent
  }

  pub fn is_accepted(&self) -> bool {
    self.status == ConnectionStatus::Accepted
  }

  pub fn is_rejected(&self) -> bool {
    self.status == ConnectionStatus::Rejected
  }
}
