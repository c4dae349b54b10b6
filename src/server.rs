use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bindings::{BINDINGS, Binding, InputValues, binding_for};
use crate::chart::ChartSpec;
use crate::state::AppState;
use crate::widgets::PageLayout;

const INDEX_HTML: &str = include_str!("../assets/index.html");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no chart is bound to output '{0}'")]
    UnknownOutput(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownOutput(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/update", post(update_handler))
        .with_state(state)
}

/// Bind and serve until the process is terminated.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Dashboard running at http://{addr}");
    axum::serve(listener, create_router(state))
        .await
        .context("serving HTTP")
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        records: state.dataset.len(),
    })
}

#[derive(Serialize)]
struct LayoutResponse<'a> {
    layout: &'a PageLayout,
    bindings: &'static [Binding],
}

async fn layout_handler(State(state): State<AppState>) -> Response {
    Json(LayoutResponse {
        layout: &state.layout,
        bindings: BINDINGS,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub output: String,
    #[serde(default)]
    pub inputs: InputValues,
}

/// Re-evaluate one output from the current widget values.
async fn update_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<ChartSpec>, ApiError> {
    let binding =
        binding_for(&req.output).ok_or_else(|| ApiError::UnknownOutput(req.output.clone()))?;
    log::debug!("update {} from {:?}", binding.output, req.inputs);
    let spec = binding.render(&state.dataset, &req.inputs);
    if spec.is_empty() {
        log::debug!("{} rendered an empty {:?} chart", binding.output, spec.kind());
    }
    Ok(Json(spec))
}
