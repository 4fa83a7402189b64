//! Leaderboard server implementation
//!
//! HTTP server using Axum: the HTML dashboard plus a small JSON API over the
//! cached leaderboard.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::{LeaderboardConfig, PipelineOptions};
use crate::core::LeaderboardCache;
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::types::LeaderboardSnapshot;
use crate::watch::{watch_file, FileWatcher};

/// Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub leaderboard: LeaderboardConfig,
    /// Invalidate the cache whenever the source workbook changes
    pub watch: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            leaderboard: LeaderboardConfig::default(),
            watch: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub config: LeaderboardConfig,
    pub options: PipelineOptions,
    pub cache: Arc<LeaderboardCache>,
}

impl AppState {
    pub fn new(config: LeaderboardConfig, cache: Arc<LeaderboardCache>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            options: config.pipeline_options(),
            config,
            cache,
        }
    }

    /// Cached leaderboard for the configured source.
    ///
    /// Spreadsheet parsing runs on the blocking pool.
    pub async fn snapshot(self: &Arc<Self>) -> LeaderboardResult<Arc<LeaderboardSnapshot>> {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            state
                .cache
                .load(&state.config.source, &state.config.categories, &state.options)
        })
        .await
        .map_err(|e| LeaderboardError::Task(e.to_string()))?
    }
}

/// Build the router; separated from `run_api_server` for testing.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dashboard and info endpoints
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // JSON API
        .route("/api/v1", get(handlers::api_index))
        .route("/api/v1/categories", get(handlers::categories))
        .route("/api/v1/leaderboard", get(handlers::leaderboard))
        .route("/api/v1/leaderboard/:category", get(handlers::category_table))
        .route("/api/v1/cache", get(handlers::cache_stats))
        .route("/api/v1/cache/clear", post(handlers::clear_cache))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the leaderboard server until SIGINT/SIGTERM
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing; a subscriber installed by the caller wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intergames_leaderboard=info,tower_http=info".into()),
        )
        .try_init();

    let cache = Arc::new(LeaderboardCache::new());
    let state = Arc::new(AppState::new(config.leaderboard.clone(), Arc::clone(&cache)));

    // Held for the server's lifetime; dropping it stops the watcher
    let _watcher: Option<FileWatcher> = if config.watch {
        let source = config.leaderboard.source.clone();
        let watched = source.clone();
        let cache = Arc::clone(&cache);
        Some(watch_file(&watched, move || cache.invalidate(&source))?)
    } else {
        None
    };

    // Warm the cache so the first page view is fast; failures are reported
    // again on each request
    if let Err(e) = state.snapshot().await {
        tracing::warn!("initial leaderboard load failed: {}", e);
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🏆 Leaderboard server starting on http://{}", addr);
    info!("   Source: {}", config.leaderboard.source.display());
    info!("   Categories: {}", config.leaderboard.categories.join(", "));
    if config.watch {
        info!("   Watching source for changes");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Leaderboard server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
