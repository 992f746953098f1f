//! Application configuration.
//!
//! Every value resolves with priority: config.toml > environment (.env is
//! loaded first) > default.
//!
//! ```toml
//! [database]
//! path = "data/study_partner.db"
//!
//! [server]
//! addr = "0.0.0.0"
//! port = 3000
//!
//! [matching]
//! mode = "exact"   # or "substring" for the legacy containment rule
//!
//! [session]
//! expiry_hours = 168
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::matching::MatchMode;
use crate::paths;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Session lifetime in hours (1 week)
pub const SESSION_EXPIRY_HOURS: i64 = 24 * 7;

/// Probability threshold for expired-session cleanup (0-255, lower = less frequent).
/// 25 means ~10% of session validations also sweep expired rows.
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== File structure ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    matching: Option<MatchingSection>,
    session: Option<SessionSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct MatchingSection {
    mode: Option<MatchMode>,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    expiry_hours: Option<i64>,
}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
    pub match_mode: MatchMode,
    pub session_expiry_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(paths::db_path()),
            server_addr: SERVER_ADDR.to_string(),
            server_port: SERVER_PORT,
            match_mode: MatchMode::default(),
            session_expiry_hours: SESSION_EXPIRY_HOURS,
        }
    }
}

impl Config {
    /// Load from `config.toml` in the working directory and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new(paths::CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Resolve from an explicit file path and environment lookup
    pub fn load_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("Ignoring invalid {}: {}", config_path.display(), e);
                    FileConfig::default()
                }
            },
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, env)
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_path = file
            .database
            .and_then(|d| d.path)
            .map(|path| {
                tracing::info!("Using database from config.toml: {}", path);
                PathBuf::from(path)
            })
            .or_else(|| {
                env("DATABASE_PATH").map(|path| {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                })
            })
            .unwrap_or_else(|| {
                tracing::info!("Using default database path: {}", defaults.database_path.display());
                defaults.database_path.clone()
            });

        let (file_addr, file_port) = file
            .server
            .map(|s| (s.addr, s.port))
            .unwrap_or((None, None));
        let server_addr = file_addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or(defaults.server_addr);
        let server_port = file_port
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(defaults.server_port);

        let match_mode = file
            .matching
            .and_then(|m| m.mode)
            .or_else(|| {
                env("MATCH_MODE").and_then(|m| {
                    let mode = MatchMode::from_str(&m);
                    if mode.is_none() {
                        tracing::warn!("Unknown MATCH_MODE '{}', using default", m);
                    }
                    mode
                })
            })
            .unwrap_or(defaults.match_mode);

        let session_expiry_hours = file
            .session
            .and_then(|s| s.expiry_hours)
            .or_else(|| env("SESSION_EXPIRY_HOURS").and_then(|h| h.parse().ok()))
            .filter(|h| *h > 0)
            .unwrap_or(defaults.session_expiry_hours);

        Self {
            database_path,
            server_addr,
            server_port,
            match_mode,
            session_expiry_hours,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml"), env_of(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::load_from(
            Path::new("/nonexistent/config.toml"),
            env_of(&[
                ("DATABASE_PATH", "/tmp/x.db"),
                ("PORT", "4000"),
                ("MATCH_MODE", "substring"),
                ("SESSION_EXPIRY_HOURS", "2"),
            ]),
        );
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert_eq!(config.session_expiry_hours, 2);
    }

    #[test]
    fn test_file_wins_over_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [database]
            path = "from_file.db"

            [matching]
            mode = "exact"

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        let config = Config::load_from(
            &path,
            env_of(&[("DATABASE_PATH", "from_env.db"), ("MATCH_MODE", "substring"), ("PORT", "1")]),
        );
        assert_eq!(config.database_path, PathBuf::from("from_file.db"));
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::load_from(
            Path::new("/nonexistent/config.toml"),
            env_of(&[("PORT", "not-a-port"), ("MATCH_MODE", "fuzzy"), ("SESSION_EXPIRY_HOURS", "-5")]),
        );
        assert_eq!(config.server_port, SERVER_PORT);
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert_eq!(config.session_expiry_hours, SESSION_EXPIRY_HOURS);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();

        let config = Config::load_from(&path, env_of(&[("PORT", "5000")]));
        assert_eq!(config.server_port, 5000);
    }
}
