use super::{store::UserStore, MatchError, MatchMode};
use crate::domain::{join_topics, normalize_topics, User};

/// Users sharing at least one of `requester_topics`, excluding `exclude_email`.
///
/// Requested topics are trimmed, blanks dropped and duplicates collapsed.
/// If nothing is left the store is not queried and the result is empty.
pub fn find_users_sharing_any_topic<S, T>(
    store: &S,
    requester_topics: &[T],
    exclude_email: &str,
    mode: MatchMode,
) -> Result<Vec<User>, MatchError>
where
    S: UserStore + ?Sized,
    T: AsRef<str>,
{
    let topics = normalize_topics(requester_topics);
    if topics.is_empty() {
        tracing::debug!("No topics provided for matching");
        return Ok(Vec::new());
    }

    let mut matched = store.find_by_any_topic(&topics, exclude_email, mode)?;
    matched.retain(|u| !u.email.eq_ignore_ascii_case(exclude_email));

    tracing::debug!(
        "Found {} users sharing topics with {} ({} mode)",
        matched.len(),
        exclude_email,
        mode.as_str()
    );
    Ok(matched)
}

/// Candidate-side matching rule shared by in-memory stores.
pub(crate) fn topics_match(mode: MatchMode, user_topics: &[String], requested: &[String]) -> bool {
    match mode {
        MatchMode::Exact => requested.iter().any(|t| user_topics.contains(t)),
        MatchMode::Substring => {
            let joined = join_topics(user_topics);
            requested.iter().any(|t| !t.is_empty() && joined.contains(t.as_str()))
        }
    }
}
