pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod search;
pub mod state;

#[cfg(test)]
pub mod testing;
