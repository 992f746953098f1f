//! Signup, login, logout and password change.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::middleware::{AuthContext, SESSION_COOKIE_NAME};
use super::password;
use crate::db::{self, try_lock, LogOnError};
use crate::domain::UserProfile;
use crate::handlers::ApiError;
use crate::session::generate_session_id;
use crate::state::AppState;
use crate::validation::{self, ValidationError};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

fn session_cookie(session_id: String, hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(hours))
        .build()
}

/// Create a session row and return the cookie carrying it
fn start_session(
    conn: &rusqlite::Connection,
    state: &AppState,
    user_id: i64,
) -> Result<Cookie<'static>, ApiError> {
    let session_id = generate_session_id();
    let hours = state.session_expiry_hours();
    db::create_session(conn, user_id, &session_id, hours)?;
    Ok(session_cookie(session_id, hours))
}

fn load_profile(conn: &rusqlite::Connection, email: &str) -> Result<UserProfile, ApiError> {
    db::get_user_by_email(conn, email)?
        .map(|u| u.to_profile(true))
        .ok_or_else(|| ApiError::NotFound(format!("No user with email {}", email)))
}

/// POST /api/signup - Create an account and log in
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = validation::normalize_email(&req.email);
    validation::validate_signup(&email, &req.password)?;

    // Hash before taking the lock
    let password_hash = password::hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to process password: {}", e)))?;

    let conn = try_lock(&state.db)?;
    if db::email_exists(&conn, &email)? {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let user_id = db::create_user(&conn, &email, &password_hash)?;
    let cookie = start_session(&conn, &state, user_id)?;
    let profile = load_profile(&conn, &email)?;
    drop(conn);

    tracing::info!("New account created: {}", email);
    Ok((StatusCode::CREATED, jar.add(cookie), Json(profile)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = validation::normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    let conn = try_lock(&state.db)?;
    let (user_id, stored_hash) = db::get_credentials(&conn, &email)?.ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.password, &stored_hash) {
        tracing::debug!("Failed login for {}", email);
        return Err(ApiError::Unauthorized);
    }

    db::update_last_login(&conn, user_id).log_warn(&format!("Failed to update last login for user {}", user_id));

    let cookie = start_session(&conn, &state, user_id)?;
    let profile = load_profile(&conn, &email)?;
    drop(conn);

    Ok((jar.add(cookie), Json(profile)))
}

/// POST /api/logout - Delete the session and clear the cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = cookie.value().to_string();
        match try_lock(&state.db) {
            Ok(conn) => db::delete_session(&conn, &session_id).log_warn_default("Failed to delete session during logout"),
            Err(e) => tracing::warn!("Failed to delete session during logout: {}", e),
        }
    }

    let removal = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (StatusCode::NO_CONTENT, jar.remove(removal))
}

/// PUT /api/me/password - Change password; every other session is signed out
pub async fn change_password(
    auth: AuthContext,
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !validation::is_valid_password(&req.new_password) {
        return Err(ValidationError::WeakPassword.into());
    }

    let stored_hash = {
        let conn = try_lock(&state.db)?;
        db::get_credentials(&conn, &auth.email)?
            .map(|(_, hash)| hash)
            .ok_or(ApiError::Unauthorized)?
    };
    if !password::verify_password(&req.current_password, &stored_hash) {
        return Err(ApiError::Forbidden("Current password is incorrect".to_string()));
    }

    let new_hash = password::hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to process password: {}", e)))?;

    let conn = try_lock(&state.db)?;
    db::update_password(&conn, &auth.email, &new_hash)?;
    let removed = db::delete_user_sessions(&conn, auth.user_id)?;
    let cookie = start_session(&conn, &state, auth.user_id)?;
    drop(conn);

    tracing::info!("Password changed for {} ({} sessions ended)", auth.email, removed);
    Ok((StatusCode::NO_CONTENT, jar.add(cookie)))
}
