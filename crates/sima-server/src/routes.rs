//! Route table and handlers.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Deserialize;
use sima_core::entities::{Certificate, NewProject, Project, ProjectSnapshot, WorkflowState};
use sima_core::enums::{Decision, Dimension};
use sima_core::requests::{AdvanceRequest, ReopenRequest};
use sima_core::responses::{
    AdvanceResponse, AnalysisResponse, ImprovementResponse, ScoreResponse, TimelineResponse,
    UploadOutcome,
};

use crate::auth::{AUTHORITIES, Principal, SUBMITTERS};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::metrics;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_text))
        .route("/v1/project/new", post(new_project))
        .route("/v1/project/{id}/upload", post(upload))
        .route("/v1/project/{id}/re-evaluate", post(re_evaluate))
        .route("/v1/project/{id}/analysis", get(analysis))
        .route("/v1/project/{id}/score", get(score))
        .route("/v1/project/{id}/improve", post(improve))
        .route("/v1/project/{id}/timeline", get(timeline))
        .route("/v1/project/{id}/certificate", get(certificate))
        .route("/v1/certificate/verify/{token}", get(verify))
        .route("/v1/workflow/{id}", get(workflow))
        .route("/v1/workflow/{id}/advance", post(advance))
        .route("/v1/workflow/{id}/reopen", post(reopen))
        .layer(middleware::from_fn_with_state(state.clone(), metrics::track))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// 200 once the store answers a query, 503 otherwise.
async fn readyz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.service.db().ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "store not ready");
            (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
        }
    }
}

async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn new_project(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    principal.require(SUBMITTERS)?;
    let new: NewProject = state
        .service
        .schema()
        .parse("new_project", body)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let project = state
        .service
        .register_project(new, principal.as_str())
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// The snapshot arrives already extracted from the uploaded files.
async fn upload(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<Json<UploadOutcome>, ApiError> {
    principal.require(SUBMITTERS)?;
    let snapshot: ProjectSnapshot = state
        .service
        .schema()
        .parse("project_snapshot", body)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let outcome = state
        .service
        .upload(&id, &snapshot, principal.as_str())
        .await?;
    Ok(Json(outcome))
}

/// Re-score the latest snapshot, e.g. after the weights changed.
async fn re_evaluate(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<UploadOutcome>, ApiError> {
    principal.require(SUBMITTERS)?;
    Ok(Json(state.service.analyze(&id).await?))
}

async fn analysis(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    Ok(Json(state.service.analysis(&id).await?))
}

async fn score(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let report = state.service.latest_score(&id).await?;
    Ok(Json(ScoreResponse::from(&report)))
}

#[derive(Debug, Deserialize)]
struct ImproveParams {
    limit: Option<usize>,
}

async fn improve(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
    Query(params): Query<ImproveParams>,
) -> Result<Json<ImprovementResponse>, ApiError> {
    let limit = params.limit.unwrap_or(Dimension::ALL.len());
    Ok(Json(state.service.improvements(&id, limit).await?))
}

async fn timeline(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let events = state.service.read_timeline(&id).await?;
    Ok(Json(TimelineResponse { events }))
}

/// Issue-or-return. The ETag is the verification token, so renderers can
/// cache the artifact per certificate.
async fn certificate(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    principal.require(AUTHORITIES)?;
    let cert = state
        .service
        .issue_certificate(&id, principal.as_str())
        .await?;
    let etag = format!("\"{}\"", cert.verification_token);
    let unchanged = headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == etag);
    state.metrics.certificate();
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response());
    }
    Ok(([(ETAG, etag)], Json(cert)).into_response())
}

async fn verify(
    State(state): State<AppState>,
    _principal: Principal,
    Path(token): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    Ok(Json(state.service.verify_certificate(&token).await?))
}

async fn workflow(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<String>,
) -> Result<Json<WorkflowState>, ApiError> {
    Ok(Json(state.service.workflow_state(&id).await?))
}

/// A missing comment reaches attribution checks as empty and fails there.
#[derive(Debug, Deserialize)]
struct TransitionBody {
    #[serde(default)]
    comment: String,
    #[serde(default)]
    decision: Option<Decision>,
}

async fn advance(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<TransitionBody>,
) -> Result<Response, ApiError> {
    principal.require(AUTHORITIES)?;
    let request = AdvanceRequest {
        expected_version: expected_version(&headers)?,
        actor: principal.name,
        comment: body.comment,
        decision: body.decision,
    };
    let moved = state.service.advance(&id, &request).await?;
    state.metrics.transition();
    Ok(versioned(moved))
}

async fn reopen(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<TransitionBody>,
) -> Result<Response, ApiError> {
    principal.require(AUTHORITIES)?;
    if body.decision.is_some() {
        return Err(ApiError::BadRequest("reopen takes no decision".into()));
    }
    let request = ReopenRequest {
        expected_version: expected_version(&headers)?,
        actor: principal.name,
        comment: body.comment,
    };
    let moved = state.service.reopen(&id, &request).await?;
    state.metrics.transition();
    Ok(versioned(moved))
}

fn versioned(moved: AdvanceResponse) -> Response {
    let etag = format!("\"{}\"", moved.version);
    ([(ETAG, etag)], Json(moved)).into_response()
}

/// Parse `If-Match: <version>`, tolerating quotes and a weak prefix.
fn expected_version(headers: &HeaderMap) -> Result<i64, ApiError> {
    let raw = headers
        .get(IF_MATCH)
        .ok_or_else(|| {
            ApiError::BadRequest("If-Match header with the expected version is required".into())
        })?
        .to_str()
        .map_err(|_| ApiError::BadRequest("If-Match header is not valid text".into()))?;
    raw.trim()
        .trim_start_matches("W/")
        .trim_matches('"')
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("If-Match '{raw}' is not a version number")))
}
