//! HTTP surface: request/response models and route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use safefetch_core::error::PipelineError;
use safefetch_core::pipeline::FetchPipeline;

pub fn router(pipeline: Arc<FetchPipeline>) -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/ping", post(ping))
        .with_state(pipeline)
}

#[derive(Debug, Deserialize)]
pub struct PingBody {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PingErrorDetails {
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<PingErrorDetails>,
}

impl PingResponse {
    fn ok(payload: String) -> Self {
        Self {
            status: "ok",
            payload: Some(payload),
            status_details: None,
        }
    }

    fn error(reason: &str) -> Self {
        Self {
            status: "error",
            payload: None,
            status_details: Some(PingErrorDetails {
                reason: reason.to_string(),
            }),
        }
    }
}

async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "safefetch",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Runs the safe-fetch pipeline for the requested URL. Expected failures
/// answer 400 with their stable reason; anything else is logged in full
/// and answered with an opaque 500.
async fn ping(
    State(pipeline): State<Arc<FetchPipeline>>,
    Json(body): Json<PingBody>,
) -> (StatusCode, Json<PingResponse>) {
    match pipeline.run(&body.url).await {
        Ok(payload) => (StatusCode::OK, Json(PingResponse::ok(payload))),
        Err(PipelineError::Fetch(err)) => {
            tracing::info!("fetch rejected for {:?}: {}", body.url, err);
            (
                StatusCode::BAD_REQUEST,
                Json(PingResponse::error(err.reason())),
            )
        }
        Err(PipelineError::Internal(err)) => {
            tracing::error!("internal error while fetching {:?}: {:#}", body.url, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PingResponse::error("internal server error")),
            )
        }
    }
}
