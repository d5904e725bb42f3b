#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod routes;
pub mod rules;
pub mod services;
pub mod state;
pub mod store;
pub mod ws;

// Re-exports for public API
pub use config::db::{db_url, DbProfile};
pub use config::server::ServerConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use services::{GameCoordinator, PairingScheduler, SchedulerConfig};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    server_test_support::logging::init();
}
