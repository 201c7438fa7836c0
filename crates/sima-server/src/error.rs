//! Error → HTTP mapping.
//!
//! Body shape: `{"error": {"code", "message", "retryable"}}`. Internal
//! failures are logged in full and answered with a generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sima_core::errors::CoreError;
use sima_db::error::DatabaseError;
use thiserror::Error;

/// Seconds a client should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self::Store(DatabaseError::Domain(e))
    }
}

/// Body that is not JSON, or JSON of the wrong shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(e) => match e.domain() {
                Some(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
                Some(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
                Some(CoreError::PartialScore { .. } | CoreError::InvalidTransition { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                Some(CoreError::StaleVersion { .. } | CoreError::NotApproved { .. }) => {
                    StatusCode::CONFLICT
                }
                Some(CoreError::LedgerUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
                Some(CoreError::Other(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                None if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::BadRequest(_) => "validation",
            Self::Store(e) => match e.domain() {
                Some(core) => core.code(),
                None if e.is_transient() => "busy",
                None => "internal",
            },
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Unauthorized(_) | Self::Forbidden(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };
        let mut body = json!({
            "error": {
                "code": self.code(),
                "message": message,
                "retryable": self.is_retryable(),
            }
        });
        if let Self::Store(DatabaseError::Domain(CoreError::PartialScore { failed, .. })) = &self {
            body["error"]["failed"] = json!(failed);
        }

        let mut resp = (status, Json(body)).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            resp.headers_mut()
                .insert("retry-after", HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status_of(e: CoreError) -> StatusCode {
        ApiError::from(e).status_code()
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(status_of(CoreError::not_found("project", "p")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(CoreError::Validation("comment".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::PartialScore {
                project_id: "p".into(),
                failed: vec![]
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(CoreError::InvalidTransition {
                project_id: "p".into(),
                from: "approved".into(),
                reason: "terminal".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(CoreError::StaleVersion {
                project_id: "p".into(),
                expected: 1,
                actual: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::NotApproved {
                project_id: "p".into(),
                stage: "submitted".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::LedgerUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn ledger_outage_sets_retry_after() {
        let resp = ApiError::from(CoreError::LedgerUnavailable("down".into())).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()["retry-after"], RETRY_AFTER_SECS);
    }

    #[test]
    fn forbidden_is_a_final_403() {
        let e = ApiError::Forbidden("role 'client' may not perform this action".into());
        assert_eq!(e.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(e.code(), "forbidden");
        assert!(!e.is_retryable());
    }

    #[test]
    fn internal_errors_are_not_retryable() {
        let e = ApiError::from(DatabaseError::NoResult);
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.code(), "internal");
        assert!(!e.is_retryable());
    }
}
