use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiError;
use crate::auth::AuthContext;
use crate::db::{self, try_lock};
use crate::domain::UserProfile;
use crate::state::AppState;
use crate::validation::normalize_email;

/// GET /api/users/{email} - Another user's profile.
/// Social links are only visible once the two users are connected.
pub async fn user_profile(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let email = normalize_email(&email);
    let conn = try_lock(&state.db)?;

    let user = db::get_user_by_email(&conn, &email)?
        .ok_or_else(|| ApiError::NotFound(format!("No user with email {}", email)))?;

    let is_self = user.email.eq_ignore_ascii_case(&auth.email);
    let show_socials = is_self || db::are_connected(&conn, &auth.email, &user.email)?;

    Ok(Json(user.to_profile(show_socials)))
}
