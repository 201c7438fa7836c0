//! Calling principal.
//!
//! With `[server].tokens` configured every `/v1` request needs
//! `Authorization: Bearer <token>`; the token's principal becomes the actor
//! and its role decides which routes it may call. Without tokens the server
//! is open, trusts `X-Actor` and treats every caller as an authority.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sima_config::Role;

use crate::error::ApiError;
use crate::state::AppState;

pub const ACTOR_HEADER: &str = "x-actor";
pub const ANONYMOUS: &str = "anonymous";

/// Roles allowed to register projects and upload snapshots.
pub const SUBMITTERS: &[Role] = &[Role::Authority, Role::Consultant];
/// Roles allowed to move the workflow and issue certificates.
pub const AUTHORITIES: &[Role] = &[Role::Authority];

/// The authenticated (or self-declared) caller, recorded as `actor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Fail with 403 unless the caller holds one of `allowed`.
    ///
    /// # Errors
    ///
    /// `ApiError::Forbidden` naming the caller's role.
    pub fn require(&self, allowed: &[Role]) -> Result<&Self, ApiError> {
        if allowed.contains(&self.role) {
            return Ok(self);
        }
        tracing::debug!(principal = %self.name, role = %self.role, "role not allowed");
        Err(ApiError::Forbidden(format!(
            "role '{}' may not perform this action",
            self.role
        )))
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !state.config.requires_auth() {
            let actor = parts
                .headers
                .get(ACTOR_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(ANONYMOUS);
            return Ok(Self {
                name: actor.to_string(),
                role: Role::Authority,
            });
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
        state
            .config
            .grant(token)
            .map(|g| Self {
                name: g.principal.clone(),
                role: g.role,
            })
            .ok_or_else(|| {
                tracing::debug!("unknown bearer token");
                ApiError::Unauthorized("unknown bearer token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            name: "someone@sima.local".into(),
            role,
        }
    }

    #[test]
    fn only_authorities_pass_the_authority_gate() {
        assert!(principal(Role::Authority).require(AUTHORITIES).is_ok());
        for role in [Role::Consultant, Role::Client] {
            let err = principal(role).require(AUTHORITIES).unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));
        }
    }

    #[test]
    fn clients_cannot_submit() {
        assert!(principal(Role::Consultant).require(SUBMITTERS).is_ok());
        assert!(principal(Role::Client).require(SUBMITTERS).is_err());
    }
}
