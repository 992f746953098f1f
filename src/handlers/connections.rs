//! Connection requests: send, list, accept, reject.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::auth::AuthContext;
use crate::db::{self, try_lock};
use crate::domain::{ConnectionRequest, ConnectionStatus};
use crate::state::AppState;
use crate::validation::{normalize_email, ValidationError};

#[derive(Deserialize)]
pub struct SendRequest {
    pub receiver_email: String,
}

/// POST /api/connections
pub async fn send_connection(
    auth: AuthContext,
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<ConnectionRequest>), ApiError> {
    let receiver = normalize_email(&req.receiver_email);
    if receiver.is_empty() {
        return Err(ValidationError::BlankField("Receiver email").into());
    }
    if receiver.eq_ignore_ascii_case(&auth.email) {
        return Err(ValidationError::SelfConnection.into());
    }

    let conn = try_lock(&state.db)?;
    if !db::email_exists(&conn, &receiver)? {
        return Err(ApiError::NotFound(format!("No user with email {}", receiver)));
    }
    if db::has_pending_request(&conn, &auth.email, &receiver)? {
        return Err(ApiError::Conflict("A request to this user is already pending".to_string()));
    }
    if db::are_connected(&conn, &auth.email, &receiver)? {
        return Err(ApiError::Conflict("You are already connected with this user".to_string()));
    }

    let id = db::insert_connection_request(&conn, &auth.email, &receiver)?;
    let request = db::get_connection(&conn, id)?
        .ok_or_else(|| ApiError::Internal("Connection request vanished after insert".to_string()))?;

    tracing::info!("Connection request {} sent: {} -> {}", id, auth.email, receiver);
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/connections - Incoming requests, one per sender
pub async fn incoming_connections(
    auth: AuthContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConnectionRequest>>, ApiError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(db::get_connection_requests(&conn, &auth.email)?))
}

/// GET /api/connections/sent
pub async fn sent_connections(
    auth: AuthContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConnectionRequest>>, ApiError> {
    let conn = try_lock(&state.db)?;
    Ok(Json(db::get_sent_requests(&conn, &auth.email)?))
}

/// Move a pending request addressed to the caller into `status`
fn answer_request(
    state: &AppState,
    auth: &AuthContext,
    id: i64,
    status: ConnectionStatus,
) -> Result<Json<ConnectionRequest>, ApiError> {
    let conn = try_lock(&state.db)?;
    let request = db::get_connection(&conn, id)?
        .ok_or_else(|| ApiError::NotFound(format!("No connection request {}", id)))?;

    if !request.receiver_email.eq_ignore_ascii_case(&auth.email) {
        return Err(ApiError::Forbidden(
            "Only the receiver can answer a connection request".to_string(),
        ));
    }
    if !request.is_pending() {
        return Err(ApiError::Conflict(format!(
            "Request {} was already {}",
            id,
            request.status.as_str().to_lowercase()
        )));
    }

    db::update_connection_status(&conn, id, status)?;
    tracing::info!("Connection request {} {} by {}", id, status.as_str(), auth.email);

    Ok(Json(ConnectionRequest { status, ..request }))
}

/// POST /api/connections/{id}/accept
pub async fn accept_connection(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConnectionRequest>, ApiError> {
    answer_request(&state, &auth, id, ConnectionStatus::Accepted)
}

/// POST /api/connections/{id}/reject
pub async fn reject_connection(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConnectionRequest>, ApiError> {
    answer_request(&state, &auth, id, ConnectionStatus::Rejected)
}
