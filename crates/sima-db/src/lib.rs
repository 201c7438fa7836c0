//! # sima-db
//!
//! libSQL store for the SIMA compliance engine.
//!
//! Holds projects, immutable score reports, workflow history, the
//! append-only timeline and issued certificates. Every state change and its
//! timeline event commit in one transaction; concurrent reviewers are
//! serialized by a compare-and-swap on the project version.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod trail;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle.
///
/// Wraps one libSQL connection. `SQLite` transactions are per connection, so
/// every unit of work holds the gate for its whole transaction; scoring and
/// other slow work happens outside it.
pub struct SimaDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: Mutex<()>,
}

impl SimaDb {
    /// Open a local database at the given path, or `:memory:`.
    ///
    /// Creates the parent directory and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != sima_config::IN_MEMORY {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
                }
            }
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        conn.query("PRAGMA busy_timeout = 5000", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let sima_db = Self {
            db,
            conn,
            gate: Mutex::new(()),
        };
        sima_db.run_migrations().await?;
        tracing::debug!(path, "store opened");
        Ok(sima_db)
    }

    /// Access the underlying libSQL connection.
    ///
    /// Callers must hold [`Self::lock`] while using it.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Acquire exclusive use of the connection.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Acquire the connection and open a transaction on it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if `BEGIN` fails.
    pub async fn begin(&self) -> Result<(MutexGuard<'_, ()>, libsql::Transaction), DatabaseError> {
        let guard = self.gate.lock().await;
        let tx = self.conn.transaction().await?;
        Ok((guard, tx))
    }

    /// Round-trip a trivial query, for readiness checks.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot answer.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let _gate = self.lock().await;
        let mut rows = self.conn.query("SELECT 1", ()).await?;
        rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"prj-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let _gate = self.lock().await;
        generate_id(&self.conn, prefix).await
    }
}

/// 8 lowercase hex chars from `randomblob(4)`.
pub(crate) async fn random_suffix(conn: &libsql::Connection) -> Result<String, DatabaseError> {
    let mut rows = conn.query("SELECT lower(hex(randomblob(4)))", ()).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

/// `{prefix}-{8 hex}` on an already-acquired connection.
pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    Ok(format!("{prefix}-{}", random_suffix(conn).await?))
}

/// Commit on success, roll back on failure.
///
/// # Errors
///
/// Returns the operation's error, or the commit error.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SimaDb {
        SimaDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in [
            "projects",
            "score_reports",
            "workflow_history",
            "timeline_events",
            "certificates",
        ] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(
                rows.next().await.unwrap().is_some(),
                "table '{table}' should exist"
            );
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("prj").await.unwrap();
        assert!(id.starts_with("prj-"), "{id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in sima_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn ping_answers_on_an_open_store() {
        test_db().await.ping().await.unwrap();
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn timeline_rows_are_immutable() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO projects (id, tracking_no, stage) VALUES ('prj-1', 'SIMA-1', 'submitted')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO timeline_events (project_id, seq, kind, payload, at)
                 VALUES ('prj-1', 1, 'UPLOAD', '{}', '2026-02-09T14:30:00+00:00')",
                (),
            )
            .await
            .unwrap();

        let update = db
            .conn()
            .execute("UPDATE timeline_events SET kind = 'ADVANCE'", ())
            .await;
        assert!(update.is_err());
        let delete = db.conn().execute("DELETE FROM timeline_events", ()).await;
        assert!(delete.is_err());
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_trace() {
        let db = test_db().await;
        let (_gate, tx) = db.begin().await.unwrap();
        let result: Result<(), DatabaseError> = async {
            tx.execute(
                "INSERT INTO projects (id, tracking_no, stage) VALUES ('prj-2', 'SIMA-2', 'submitted')",
                (),
            )
            .await?;
            Err(DatabaseError::InvalidState("abort".into()))
        }
        .await;
        assert!(finish(tx, result).await.is_err());

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM projects", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }
}
