use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Auth
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        // Onboarding / profile
        .route("/api/me", get(handlers::me))
        .route("/api/me/password", put(auth::change_password))
        .route("/api/me/profile", put(handlers::update_profile))
        .route("/api/me/topics", put(handlers::update_topics))
        .route("/api/me/study-time", put(handlers::update_study_time))
        .route("/api/me/difficulty", put(handlers::update_difficulty))
        .route("/api/me/socials", put(handlers::update_socials))
        .route("/api/me/setup-complete", post(handlers::complete_setup))
        .route("/api/topics", get(handlers::vocabularies))
        // Matching
        .route("/api/matches", get(handlers::matches))
        .route("/api/users/{email}", get(handlers::user_profile))
        // Connections
        .route(
            "/api/connections",
            get(handlers::incoming_connections).post(handlers::send_connection),
        )
        .route("/api/connections/sent", get(handlers::sent_connections))
        .route("/api/connections/{id}/accept", post(handlers::accept_connection))
        .route("/api/connections/{id}/reject", post(handlers::reject_connection))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
