//! Accounts, password hashing and cookie sessions.

pub mod handlers;
pub mod middleware;
pub mod password;

pub use handlers::*;
pub use middleware::{AuthContext, SESSION_COOKIE_NAME};
