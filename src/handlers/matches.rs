use axum::{extract::State, Json};
use serde::Serialize;

use super::ApiError;
use crate::auth::AuthContext;
use crate::db::try_lock;
use crate::domain::UserProfile;
use crate::matching::{self, MatchOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub topic: String,
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub mode: &'static str,
    /// The caller's own topics, in the order they listed them
    pub topics: Vec<String>,
    pub groups: Vec<GroupView>,
}

impl MatchesResponse {
    fn from_outcome(outcome: MatchOutcome, mode: &'static str) -> Self {
        let groups = outcome
            .groups
            .into_groups()
            .into_iter()
            .map(|g| GroupView {
                topic: g.topic,
                users: g.users.iter().map(|u| u.to_profile(false)).collect(),
            })
            .collect();
        Self {
            mode,
            topics: outcome.topics,
            groups,
        }
    }
}

/// GET /api/matches - Study partners grouped by the caller's topics
pub async fn matches(auth: AuthContext, State(state): State<AppState>) -> Result<Json<MatchesResponse>, ApiError> {
    let mode = state.match_mode();
    let outcome = {
        let conn = try_lock(&state.db)?;
        matching::match_for_user(&*conn, &auth.email, mode)?
    };

    tracing::debug!(
        "{} matched {} users in {} groups",
        auth.email,
        outcome.matched.len(),
        outcome.groups.len()
    );
    Ok(Json(MatchesResponse::from_outcome(outcome, mode.as_str())))
}
