pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod matching;
pub mod paths;
pub mod session;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;
