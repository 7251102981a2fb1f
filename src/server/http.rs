//! HTTP trigger endpoint

use super::tracker::RunTracker;
use crate::core::pipeline::{ReportPipeline, TriggerOutcome};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Shared state of the HTTP router
#[derive(Clone)]
pub struct AppState {
    /// The packaging pipeline
    pub pipeline: ReportPipeline,

    /// Runs started through the trigger surface
    pub runs: RunTracker,
}

impl AppState {
    /// Create the router state
    pub fn new(pipeline: ReportPipeline, runs: RunTracker) -> Self {
        Self { pipeline, runs }
    }
}

/// JSON body returned by the trigger endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub status: u16,
    pub title: String,
}

impl TriggerResponse {
    fn new(status: StatusCode, title: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: status.as_u16(),
                title: title.into(),
            }),
        )
    }
}

/// Creates the trigger router
///
/// `trigger_path` accepts `POST`; `/health` answers `GET`.
pub fn trigger_router(state: AppState, trigger_path: &str) -> Router {
    Router::new()
        .route(trigger_path, post(trigger))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn trigger(State(state): State<AppState>) -> (StatusCode, Json<TriggerResponse>) {
    match state.pipeline.trigger().await {
        Ok(TriggerOutcome::Accepted(run)) => {
            tracing::info!(
                run_id = %run.run_id(),
                report_count = run.report_count(),
                "Packaging run accepted"
            );
            state.runs.track(run);
            TriggerResponse::new(StatusCode::ACCEPTED, "processing")
        }
        Ok(TriggerOutcome::AlreadyRunning) => {
            TriggerResponse::new(StatusCode::SERVICE_UNAVAILABLE, "already running")
        }
        Ok(TriggerOutcome::NothingToDo) => TriggerResponse::new(StatusCode::OK, "nothing to do"),
        Err(e) => {
            tracing::error!(error = %e, "Packaging trigger failed");
            TriggerResponse::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "runs_in_flight": state.runs.in_flight(),
    }))
}
