//! HTTP surface: `GET /health`, `POST /ask`, `POST /ingest`.
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use localrag_core::types::{AnswerResponse, IngestReport};
use localrag_core::Error;
use localrag_pipeline::{Health, RagService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RagService>,
    pub documents_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Pipeline errors rendered as `{"error", "retryable"}`.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidParameters(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
            Error::NoDocumentsFound(_) => StatusCode::NOT_FOUND,
            Error::RetrievalFailed(_) | Error::GenerationFailed(_) | Error::Embedding(_) | Error::Index(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Extraction { .. } | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self.0, "request failed");
        (status, Json(json!({ "error": self.0.to_string(), "retryable": self.0.is_retryable() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/ingest", post(ingest))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(state.service.health())
}

async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Result<Json<AnswerResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(Error::InvalidParameters("question must not be empty".to_string()).into());
    }
    Ok(Json(state.service.answer(&req.question).await?))
}

async fn ingest(State(state): State<AppState>) -> Result<Json<IngestReport>, ApiError> {
    Ok(Json(state.service.ingest_all(&state.documents_dir).await?))
}

pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
