//! Topic matching: find users who share a topic with the requester and
//! group them by topic.
//!
//! Two stages:
//! 1. [`find_users_sharing_any_topic`] asks a [`UserStore`] for candidates.
//! 2. [`group_by_topic`] partitions them by the requester's topics.
//!
//! Both are synchronous, read-only and hold no shared state, so concurrent
//! callers need no coordination beyond the store's own locking.
//!
//! ## Match modes
//!
//! - `Exact` (default): a candidate must hold one of the requested topics.
//! - `Substring`: legacy behavior where the candidate's `", "`-joined topic
//!   string only has to contain a requested topic, so `"Science"` matches
//!   `"Computer Science"`. The grouper still uses exact membership, so a
//!   candidate matched only by substring lands in no group.

pub mod grouper;
pub mod matcher;
pub mod store;

use serde::Deserialize;

use crate::db::DbLockError;
use crate::domain::User;

pub use grouper::{group_by_topic, TopicGroup, TopicGroups};
pub use matcher::find_users_sharing_any_topic;
pub use store::UserStore;

/// How candidate topics are compared against the requester's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Exact,
    Substring,
}

impl MatchMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(Self::Exact),
            "substring" | "legacy" => Some(Self::Substring),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
        }
    }
}

/// Storage failure surfaced to the matcher
#[derive(Debug)]
pub enum DataAccessError {
    Query(String),
    Unavailable,
}

impl std::fmt::Display for DataAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataAccessError::Query(err) => write!(f, "Data access failed: {}", err),
            DataAccessError::Unavailable => write!(f, "Data store unavailable"),
        }
    }
}

impl std::error::Error for DataAccessError {}

impl From<rusqlite::Error> for DataAccessError {
    fn from(err: rusqlite::Error) -> Self {
        DataAccessError::Query(err.to_string())
    }
}

impl From<DbLockError> for DataAccessError {
    fn from(_: DbLockError) -> Self {
        DataAccessError::Unavailable
    }
}

#[derive(Debug)]
pub enum MatchError {
    DataAccess(DataAccessError),
    UnknownUser(String),
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::DataAccess(err) => write!(f, "{}", err),
            MatchError::UnknownUser(email) => write!(f, "Unknown user: {}", email),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::DataAccess(err) => Some(err),
            MatchError::UnknownUser(_) => None,
        }
    }
}

impl From<DataAccessError> for MatchError {
    fn from(err: DataAccessError) -> Self {
        MatchError::DataAccess(err)
    }
}

/// Everything a match view needs for one requester
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// The requester's topics, normalized
    pub topics: Vec<String>,
    pub matched: Vec<User>,
    pub groups: TopicGroups,
}

/// Load the requester, match on their topics and group the result.
pub fn match_for_user<S>(store: &S, requester_email: &str, mode: MatchMode) -> Result<MatchOutcome, MatchError>
where
    S: UserStore + ?Sized,
{
    let requester = store
        .get_by_email(requester_email)?
        .ok_or_else(|| MatchError::UnknownUser(requester_email.to_string()))?;

    let topics = crate::domain::normalize_topics(&requester.topics_interested);
    if topics.is_empty() {
        tracing::debug!("{} has no topics to match", requester.email);
        return Ok(MatchOutcome::default());
    }

    let matched = find_users_sharing_any_topic(store, topics.as_slice(), &requester.email, mode)?;
    let groups = group_by_topic(topics.as_slice(), &matched);

    Ok(MatchOutcome {
        topics,
        matched,
        groups,
    })
}
