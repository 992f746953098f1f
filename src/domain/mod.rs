pub mod connection;
pub mod topics;
pub mod user;

pub use connection::{ConnectionRequest, ConnectionStatus};
pub use topics::{join_topics, normalize_topics, parse_topics};
pub use user::{ProfileUpdate, Socials, User, UserProfile};
