//! Database error types for sima-db.

use sima_core::errors::CoreError;
use thiserror::Error;

use crate::retry::is_transient_error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// The domain error, if this is one.
    #[must_use]
    pub const fn domain(&self) -> Option<&CoreError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the caller may retry after re-reading state.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_retryable(),
            _ => self.is_transient(),
        }
    }

    /// Busy/locked database; the same statement may succeed shortly.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::LibSql(e) if is_transient_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_retry_class() {
        let stale = DatabaseError::from(CoreError::StaleVersion {
            project_id: "prj-1".into(),
            expected: 1,
            actual: 2,
        });
        assert!(stale.is_retryable());
        assert!(stale.domain().is_some());

        let invalid = DatabaseError::from(CoreError::Validation("comment".into()));
        assert!(!invalid.is_retryable());
        assert!(!DatabaseError::NoResult.is_retryable());
    }
}
