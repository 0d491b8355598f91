//! API Handlers
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};
use vdp_core::{schema, CallerOverrides, ExecutionContext, VdpError, VDP_VERSION};

/// Body of `POST /v1/profiles/validate`
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub candidate: Value,
    pub overrides: CallerOverrides,
    /// Verbosity profile the caller expects the server to run
    #[serde(default)]
    pub profile: Option<String>,
}

pub async fn validate_profile(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": rejection.body_text() }))).into_response();
        }
    };

    let mut ctx = ExecutionContext::new(request.overrides);
    if let Some(profile) = request.profile {
        ctx = ctx.with_profile(profile);
    }
    match state.pipeline.run(request.candidate, &ctx) {
        Ok(accepted) => {
            state.metrics.record_accepted(&accepted);
            (StatusCode::OK, Json(accepted)).into_response()
        }
        Err(VdpError::Validation(rejection)) => {
            state.metrics.record_rejected(&rejection.stage);
            warn!(trace_id = %ctx.trace_id, stage = %rejection.stage, "validation request rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": VdpError::Validation(rejection.clone()).to_string(),
                    "stage": rejection.stage,
                    "trace_id": ctx.trace_id,
                    "violations": rejection.violations,
                })),
            )
                .into_response()
        }
        Err(e @ VdpError::Config(_)) => {
            warn!(trace_id = %ctx.trace_id, error = %e, "validation request refused");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string(), "trace_id": ctx.trace_id }))).into_response()
        }
        Err(e) => {
            error!(trace_id = %ctx.trace_id, error = %e, "pipeline failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn get_schema() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "version": VDP_VERSION, "fields": schema::flatten() })))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": VDP_VERSION,
            "pipeline": state.pipeline.pipeline_id(),
            "profile": state.pipeline.verbosity_profile(),
        })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(text) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
