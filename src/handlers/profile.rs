//! Onboarding and profile endpoints for the logged-in user.

use axum::{extract::State, Json};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::auth::AuthContext;
use crate::db::{self, try_lock};
use crate::domain::topics::{DIFFICULTY_LEVELS, STUDY_TIME_VOCABULARY, TOPIC_VOCABULARY};
use crate::domain::{normalize_topics, ProfileUpdate, Socials, UserProfile};
use crate::state::AppState;
use crate::validation::{self, ValidationError};

#[derive(Deserialize)]
pub struct TopicsRequest {
    pub topics: Vec<String>,
}

#[derive(Deserialize)]
pub struct StudyTimeRequest {
    pub times: Vec<String>,
}

#[derive(Deserialize)]
pub struct DifficultyRequest {
    pub level: String,
}

/// Choices offered during onboarding. Advisory only; stored values are free text.
#[derive(Serialize)]
pub struct Vocabularies {
    pub topics: &'static [&'static str],
    pub study_times: &'static [&'static str],
    pub difficulty_levels: &'static [&'static str],
}

/// Full profile of `email`, socials included
fn own_profile(conn: &Connection, email: &str) -> Result<UserProfile, ApiError> {
    db::get_user_by_email(conn, email)?
        .map(|u| u.to_profile(true))
        .ok_or_else(|| ApiError::NotFound(format!("No user with email {}", email)))
}

/// Run an update for the caller, then return the fresh profile
fn update_and_reload(
    state: &AppState,
    email: &str,
    update: impl FnOnce(&Connection) -> rusqlite::Result<bool>,
) -> Result<Json<UserProfile>, ApiError> {
    let conn = try_lock(&state.db)?;
    if !update(&conn)? {
        return Err(ApiError::NotFound(format!("No user with email {}", email)));
    }
    Ok(Json(own_profile(&conn, email)?))
}

/// GET /api/me
pub async fn me(auth: AuthContext, State(state): State<AppState>) -> Result<Json<UserProfile>, ApiError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(own_profile(&conn, &auth.email)?))
}

/// PUT /api/me/profile
pub async fn update_profile(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    validation::validate_profile(&update)?;
    update_and_reload(&state, &auth.email, |conn| db::update_profile(conn, &auth.email, &update))
}

/// PUT /api/me/topics
pub async fn update_topics(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(req): Json<TopicsRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let topics = normalize_topics(&req.topics);
    for topic in &topics {
        validation::validate_topic_label(topic)?;
    }
    if topics.is_empty() {
        return Err(ValidationError::EmptyList("topic").into());
    }

    tracing::debug!("{} now studies {:?}", auth.email, topics);
    update_and_reload(&state, &auth.email, |conn| db::set_topics(conn, &auth.email, &topics))
}

/// PUT /api/me/study-time
pub async fn update_study_time(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(req): Json<StudyTimeRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let times = normalize_topics(&req.times);
    if times.is_empty() {
        return Err(ValidationError::EmptyList("study time").into());
    }
    update_and_reload(&state, &auth.email, |conn| db::set_study_time(conn, &auth.email, &times))
}

/// PUT /api/me/difficulty
pub async fn update_difficulty(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(req): Json<DifficultyRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let level = req.level.trim();
    if level.is_empty() {
        return Err(ValidationError::BlankField("Difficulty level").into());
    }
    update_and_reload(&state, &auth.email, |conn| db::set_difficulty(conn, &auth.email, level))
}

/// PUT /api/me/socials
pub async fn update_socials(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(socials): Json<Socials>,
) -> Result<Json<UserProfile>, ApiError> {
    let socials = Socials {
        linkedin_url: socials.linkedin_url.trim().to_string(),
        github_url: socials.github_url.trim().to_string(),
        personal_website_url: socials.personal_website_url.trim().to_string(),
    };
    validation::validate_socials(&socials)?;
    update_and_reload(&state, &auth.email, |conn| db::save_socials(conn, &auth.email, &socials))
}

/// POST /api/me/setup-complete
pub async fn complete_setup(auth: AuthContext, State(state): State<AppState>) -> Result<Json<UserProfile>, ApiError> {
    update_and_reload(&state, &auth.email, |conn| db::mark_setup_complete(conn, &auth.email))
}

/// GET /api/topics
pub async fn vocabularies() -> Json<Vocabularies> {
    Json(Vocabularies {
        topics: &TOPIC_VOCABULARY,
        study_times: &STUDY_TIME_VOCABULARY,
        difficulty_levels: &DIFFICULTY_LEVELS,
    })
}
