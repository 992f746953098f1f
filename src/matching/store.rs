//! Read side of the user store as seen by the matcher.

use rusqlite::Connection;

use super::{matcher::topics_match, DataAccessError, MatchMode};
use crate::db;
use crate::domain::User;

/// Read queries the matcher depends on.
pub trait UserStore {
    fn get_by_email(&self, email: &str) -> Result<Option<User>, DataAccessError>;

    /// Users matching any of `topics` under `mode`, never including
    /// `exclude_email`, in storage order. `topics` is already normalized.
    fn find_by_any_topic(
        &self,
        topics: &[String],
        exclude_email: &str,
        mode: MatchMode,
    ) -> Result<Vec<User>, DataAccessError>;
}

impl UserStore for Connection {
    fn get_by_email(&self, email: &str) -> Result<Option<User>, DataAccessError> {
        Ok(db::get_user_by_email(self, email)?)
    }

    fn find_by_any_topic(
        &self,
        topics: &[String],
        exclude_email: &str,
        mode: MatchMode,
    ) -> Result<Vec<User>, DataAccessError> {
        let users = match mode {
            MatchMode::Exact => db::find_users_with_any_topic(self, topics, exclude_email)?,
            MatchMode::Substring => db::find_users_with_topic_substring(self, topics, exclude_email)?,
        };
        Ok(users)
    }
}

/// A point-in-time candidate pool held in memory
impl UserStore for [User] {
    fn get_by_email(&self, email: &str) -> Result<Option<User>, DataAccessError> {
        Ok(self.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    fn find_by_any_topic(
        &self,
        topics: &[String],
        exclude_email: &str,
        mode: MatchMode,
    ) -> Result<Vec<User>, DataAccessError> {
        Ok(self
            .iter()
            .filter(|u| !u.email.eq_ignore_ascii_case(exclude_email))
            .filter(|u| topics_match(mode, &u.topics_interested, topics))
            .cloned()
            .collect())
    }
}
