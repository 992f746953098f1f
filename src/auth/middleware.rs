//! Authentication extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::db::{self, try_lock};
use crate::handlers::ApiError;
use crate::session;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "sp_session";

/// Authenticated request context.
/// Add this as a handler parameter to require authentication.
/// Rejects with 401 if the session cookie is missing, unknown or expired.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let conn = try_lock(&state.db)?;
        session::maybe_cleanup_expired(&conn);

        let (user_id, email) = db::get_session_user(&conn, &session_id)?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthContext { user_id, email })
    }
}
