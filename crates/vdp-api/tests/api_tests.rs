//! Route tests driven through `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vdp_api::{create_app, AppState};
use vdp_pipeline::ProfilePipeline;

fn sample() -> Value {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let text = std::fs::read_to_string(workspace_root.join("fixtures/sample_vdp.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn app() -> Router {
    create_app(AppState::new(ProfilePipeline::strict()).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn validate_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/profiles/validate")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// =============================================================================
// POST /v1/profiles/validate
// =============================================================================

#[tokio::test]
async fn test_valid_candidate_is_accepted() {
    let body = json!({ "candidate": sample(), "overrides": { "content_id": "000042" } });
    let (status, bytes) = send(app(), validate_request(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["profile"]["content_id"], "000042");
    assert_eq!(report["qa_flags"], json!([]));
    assert_eq!(report["proofs"].as_array().unwrap().len(), 5);
    assert_eq!(report["verbosity_profile"], "strict@1.0");
}

#[tokio::test]
async fn test_enum_violation_is_unprocessable() {
    let mut candidate = sample();
    candidate["scenes"][0]["shots"][0]["camera"]["shot"] = json!("ULTRA_WIDE");
    let body = json!({ "candidate": candidate, "overrides": { "content_id": "000042" } });

    let (status, bytes) = send(app(), validate_request(body.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["stage"], "structural");
    assert_eq!(report["violations"][0]["kind"], "EnumViolation");
    assert_eq!(report["violations"][0]["path"], "scenes[0].shots[0].camera.shot");
    assert!(report["error"].as_str().unwrap().starts_with("VALIDATION/"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (status, bytes) = send(app(), validate_request("{ not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(report["error"].is_string());
}

#[tokio::test]
async fn test_requested_profile_must_be_the_served_one() {
    let body = json!({ "candidate": sample(), "overrides": { "content_id": "1" }, "profile": "strict@1.0" });
    let (status, _) = send(app(), validate_request(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "candidate": sample(), "overrides": { "content_id": "1" }, "profile": "relaxed@1.0" });
    let (status, bytes) = send(app(), validate_request(body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(report["error"].as_str().unwrap().starts_with("CONFIG/"));
    assert!(report["trace_id"].is_string());
}

#[tokio::test]
async fn test_missing_overrides_is_bad_request() {
    let body = json!({ "candidate": sample() });
    let (status, _) = send(app(), validate_request(body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Schema, Health, Metrics
// =============================================================================

#[tokio::test]
async fn test_schema_lists_language_policies() {
    let (status, bytes) = send(app(), get("/v1/schema")).await;
    assert_eq!(status, StatusCode::OK);

    let schema: Value = serde_json::from_slice(&bytes).unwrap();
    let fields = schema["fields"].as_array().unwrap();
    let dialogue = fields
        .iter()
        .find(|f| f["path"] == "scenes[*].narrative_unit.dialogue")
        .unwrap();
    assert_eq!(dialogue["lang"]["policy"], "preserve_original");
    assert_eq!(dialogue["lang"]["tag"], "dialogue_lang");
    assert_eq!(dialogue["required"], true);
}

#[tokio::test]
async fn test_health() {
    let (status, bytes) = send(app(), get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["profile"], "strict@1.0");
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let app = app();

    let accepted = json!({ "candidate": sample(), "overrides": { "content_id": "1" } });
    let (status, _) = send(app.clone(), validate_request(accepted.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let mut candidate = sample();
    candidate["scenes"][1]["duration_sec"] = json!(4.0);
    let rejected = json!({ "candidate": candidate, "overrides": { "content_id": "2" } });
    let (status, _) = send(app.clone(), validate_request(rejected.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, bytes) = send(app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("vdp_profiles_accepted_total 1"));
    assert!(text.contains("vdp_profiles_rejected_total{stage=\"temporal\"} 1"));
}
