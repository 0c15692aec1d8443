pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod state;

pub use server::app;
pub use state::AppState;
