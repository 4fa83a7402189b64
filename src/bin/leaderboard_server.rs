//! Leaderboard server binary
//!
//! Serves the HTML dashboard and the JSON leaderboard API.

use clap::Parser;
use intergames_leaderboard::api::{run_api_server, ApiConfig};
use intergames_leaderboard::config::LeaderboardConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leaderboard-server")]
#[command(version)]
#[command(about = "Leaderboard Server - web dashboard for ranked competition results")]
#[command(long_about = r#"
Leaderboard Server - web dashboard for ranked competition results

Endpoints:
  - GET  /                              - HTML dashboard (?category=<name>)
  - GET  /api/v1/categories             - Categories with row counts and warnings
  - GET  /api/v1/leaderboard            - All ranked tables
  - GET  /api/v1/leaderboard/:category  - One ranked table
  - GET  /api/v1/cache                  - Cache statistics
  - POST /api/v1/cache/clear            - Drop cached leaderboards

Additional endpoints:
  - GET  /health                        - Health check
  - GET  /version                       - Server version info
  - GET  /api/v1                        - API index

Example usage:
  leaderboard-server --source results.xlsx
  leaderboard-server --config leaderboard.yaml --host 0.0.0.0 --port 3000 --watch
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "LEADERBOARD_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "LEADERBOARD_PORT")]
    port: u16,

    /// Configuration file (YAML)
    #[arg(long, env = "LEADERBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Results workbook, overriding the configured source
    #[arg(short, long, env = "LEADERBOARD_SOURCE")]
    source: Option<PathBuf>,

    /// Reload the leaderboard when the workbook changes
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let leaderboard = LeaderboardConfig::resolve(args.config.as_deref(), args.source)?;

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        leaderboard,
        watch: args.watch,
    };

    run_api_server(config).await
}
