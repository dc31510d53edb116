//! GreenGrid REST API
//!
//! Axum router over [`DualGridService`]. Every handler builds a fresh
//! request context so the configured deadline applies per request.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use greengrid_catalog::CdnProviderSummary;
use greengrid_common::{ContentType, GridError};
use greengrid_engine::{DualGridRequest, DualGridResult, DualGridService, EdgeAlternative};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// API state
pub struct AppState {
    pub service: DualGridService,
}

impl AppState {
    pub fn new(service: DualGridService) -> Self {
        Self { service }
    }
}

/// Create API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dual-grid
        .route("/api/v1/dual-grid", post(dual_grid))

        // Edge selection
        .route("/api/v1/edges/optimal", get(optimal_edge))
        .route("/api/v1/edges/alternatives", get(alternatives))
        .route("/api/v1/providers", get(list_providers))

        // Health
        .route("/health", get(health_check))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

/// Failure rendered as `{error, kind}`
#[derive(Debug)]
pub enum ApiError {
    /// Engine error
    Grid(GridError),
    /// Body or query string could not be extracted
    InvalidRequest { status: StatusCode, message: String },
}

impl From<GridError> for ApiError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Grid(GridError::UnknownCdnProvider(_)) => StatusCode::NOT_FOUND,
            Self::Grid(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Grid(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest { status, .. } => *status,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Grid(e) => ErrorBody {
                error: e.to_string(),
                kind: e.kind().to_string(),
            },
            Self::InvalidRequest { message, .. } => ErrorBody {
                error: message.clone(),
                kind: "invalid_request".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        if status.is_server_error() {
            tracing::error!(error = %body.error, "request failed");
        } else {
            tracing::debug!(error = %body.error, kind = %body.kind, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

// ==================== Handlers ====================

async fn dual_grid(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DualGridRequest>, JsonRejection>,
) -> Result<Json<DualGridResult>, ApiError> {
    let Json(req) = payload?;
    let ctx = state.service.context();
    Ok(Json(state.service.compute_dual_grid(&ctx, &req).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimalEdgeQuery {
    user_location: String,
    cdn_provider: String,
    #[serde(default = "default_content_type")]
    content_type: String,
}

async fn optimal_edge(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OptimalEdgeQuery>, QueryRejection>,
) -> Result<Json<EdgeAlternative>, ApiError> {
    let Query(q) = query?;
    let ctx = state.service.context();
    let edge = state
        .service
        .optimal_edge(&ctx, &q.user_location, None, &q.cdn_provider, &q.content_type)
        .await?;
    Ok(Json(edge))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlternativesQuery {
    user_location: String,
    current_edge: String,
    cdn_provider: String,
    #[serde(default = "default_content_type")]
    content_type: String,
    max_results: Option<i64>,
}

async fn alternatives(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlternativesQuery>, QueryRejection>,
) -> Result<Json<Vec<EdgeAlternative>>, ApiError> {
    let Query(q) = query?;
    let ctx = state.service.context();
    let alts = state
        .service
        .alternatives(
            &ctx,
            &q.user_location,
            &q.current_edge,
            &q.cdn_provider,
            &q.content_type,
            q.max_results,
        )
        .await?;
    Ok(Json(alts))
}

fn default_content_type() -> String {
    ContentType::Static.as_str().to_string()
}

async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<CdnProviderSummary>> {
    Json(state.service.list_providers())
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: state.service.provider_name().into(),
    })
}

/// Start API server
pub async fn start_server(bind_addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("GreenGrid API listening on {}", bind_addr);

    axum::serve(listener, app).await
}
