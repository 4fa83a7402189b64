//! Leaderboard web server
//!
//! Serves the HTML dashboard and a JSON API over the cached leaderboard.
//! Run with `leaderboard serve` or `leaderboard-server`.

pub mod dashboard;
pub mod handlers;
pub mod server;

pub use server::{create_router, run_api_server, ApiConfig, AppState};
