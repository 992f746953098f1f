use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use study_partner::{app, config::Config, db, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "study_partner=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load();
  tracing::info!("Matching mode: {}", config.match_mode.as_str());

  let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

  {
    let conn = db::try_lock(&pool).expect("Database lock failed during startup");
    match db::cleanup_expired_sessions(&conn) {
      Ok(n) if n > 0 => tracing::info!("Removed {} expired sessions", n),
      Ok(_) => {}
      Err(e) => tracing::warn!("Failed to clean up expired sessions: {}", e),
    }
    let users = db::get_user_count(&conn).unwrap_or(0);
    tracing::info!("{} registered users", users);
  }

  let bind_addr = config.bind_addr();
  let port = config.server_port;
  let app = app::build_router(AppState::new(pool, config));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
