//! API request handlers
//!
//! Handlers for the dashboard page and the JSON endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::CacheStats;
use crate::error::LeaderboardError;
use crate::types::{CategoryTable, LeaderboardSnapshot};

use super::dashboard::render_dashboard;
use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

fn fail<T: Serialize>(status: StatusCode, message: impl Into<String>) -> ApiResult<T> {
    (status, Json(ApiResponse::err(message)))
}

fn load_failure<T: Serialize>(err: &LeaderboardError) -> ApiResult<T> {
    tracing::error!("leaderboard load failed: {}", err);
    let status = if err.is_source_error() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    fail(status, err.to_string())
}

/// Dashboard query string
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub category: Option<String>,
}

/// GET / - HTML dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let selected = query.category.as_deref().filter(|c| !c.is_empty());
    let loaded = state.snapshot().await;
    let status = if loaded.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let html = render_dashboard(&state.config, loaded.as_deref(), selected);
    (status, Html(html))
}

/// API index response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET /api/v1 - API index
pub async fn api_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Leaderboard Server".to_string(),
        version: state.version.clone(),
        description: format!("{} - {}", state.config.title, state.config.subtitle),
        endpoints: vec![
            EndpointInfo::new("GET", "/", "HTML dashboard (?category=<name>)"),
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("GET", "/api/v1/categories", "List categories with row counts"),
            EndpointInfo::new("GET", "/api/v1/leaderboard", "All ranked tables"),
            EndpointInfo::new(
                "GET",
                "/api/v1/leaderboard/:category",
                "One category's ranked table",
            ),
            EndpointInfo::new("GET", "/api/v1/cache", "Cache statistics"),
            EndpointInfo::new("POST", "/api/v1/cache/clear", "Drop cached leaderboards"),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "dashboard".to_string(),
            "categories".to_string(),
            "leaderboard".to_string(),
            "cache".to_string(),
        ],
    }))
}

/// One entry of the category list
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub rows: usize,
    pub ranked: bool,
    pub warnings: Vec<String>,
}

impl From<&CategoryTable> for CategorySummary {
    fn from(table: &CategoryTable) -> Self {
        Self {
            name: table.category.clone(),
            rows: table.row_count(),
            ranked: table.ranked,
            warnings: table.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// GET /api/v1/categories - Category names, sizes and warnings
pub async fn categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.snapshot().await {
        Ok(snapshot) => ok(snapshot
            .tables
            .iter()
            .map(CategorySummary::from)
            .collect::<Vec<_>>()),
        Err(e) => load_failure(&e),
    }
}

/// GET /api/v1/leaderboard - Every ranked table
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<LeaderboardSnapshot> {
    match state.snapshot().await {
        Ok(snapshot) => ok(snapshot.as_ref().clone()),
        Err(e) => load_failure(&e),
    }
}

/// GET /api/v1/leaderboard/:category - One ranked table
pub async fn category_table(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> ApiResult<CategoryTable> {
    let snapshot = match state.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return load_failure(&e),
    };

    match snapshot.get(&category) {
        Some(table) => ok(table.clone()),
        None => fail(
            StatusCode::NOT_FOUND,
            format!("Unknown category '{}'", category),
        ),
    }
}

/// GET /api/v1/cache - Cache statistics
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> ApiResult<CacheStats> {
    ok(state.cache.stats())
}

/// POST /api/v1/cache/clear - Drop cached snapshots
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> ApiResult<CacheStats> {
    state.cache.clear();
    ok(state.cache.stats())
}
