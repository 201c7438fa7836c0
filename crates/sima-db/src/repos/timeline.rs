//! Timeline ledger: append-only, per-project ordered events.
//!
//! `seq` is computed as `MAX(seq) + 1` by the inserting statement itself, so
//! inside a transaction the per-project order equals commit order. A failed
//! append surfaces as `LedgerUnavailable` and the caller's transaction rolls
//! back the paired state change.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sima_core::entities::TimelineEvent;
use sima_core::enums::EventKind;
use sima_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json, to_json};
use crate::repos::project::require_project;
use crate::service::SimaService;
use crate::finish;

const SELECT_COLS: &str = "project_id, seq, kind, payload, at";

fn row_to_event(row: &libsql::Row) -> Result<TimelineEvent, DatabaseError> {
    Ok(TimelineEvent {
        project_id: row.get(0)?,
        seq: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        payload: parse_json(&row.get::<String>(3)?)?,
        at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

/// Append one event on `conn` (normally an open transaction).
pub(crate) async fn append_in<P: Serialize>(
    conn: &libsql::Connection,
    project_id: &str,
    kind: EventKind,
    payload: &P,
    at: DateTime<Utc>,
) -> Result<TimelineEvent, DatabaseError> {
    let payload = serde_json::to_value(payload).map_err(|e| DatabaseError::Other(e.into()))?;
    let payload_text = to_json(&payload)?;
    let ledger_down = |e: libsql::Error| {
        tracing::warn!(project_id, kind = %kind, error = %e, "timeline append failed");
        DatabaseError::Domain(CoreError::LedgerUnavailable(e.to_string()))
    };

    let mut rows = conn
        .query(
            "INSERT INTO timeline_events (project_id, seq, kind, payload, at)
             SELECT ?1, COALESCE(MAX(seq), 0) + 1, ?2, ?3, ?4
             FROM timeline_events WHERE project_id = ?1
             RETURNING seq",
            libsql::params![project_id, kind.as_str(), payload_text, at.to_rfc3339()],
        )
        .await
        .map_err(ledger_down)?;
    let row = rows
        .next()
        .await
        .map_err(ledger_down)?
        .ok_or_else(|| {
            DatabaseError::Domain(CoreError::LedgerUnavailable(
                "insert returned no sequence number".into(),
            ))
        })?;
    let seq: i64 = row.get(0)?;

    tracing::debug!(project_id, seq, kind = %kind, "timeline event appended");
    Ok(TimelineEvent {
        project_id: project_id.to_string(),
        seq,
        kind,
        payload,
        at,
    })
}

pub(crate) async fn read_in(
    conn: &libsql::Connection,
    project_id: &str,
) -> Result<Vec<TimelineEvent>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM timeline_events WHERE project_id = ?1 ORDER BY seq"
            ),
            [project_id],
        )
        .await?;
    let mut events = Vec::new();
    while let Some(row) = rows.next().await? {
        events.push(row_to_event(&row)?);
    }
    Ok(events)
}

impl SimaService {
    /// Append an externally produced event to a project's timeline.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project, `LedgerUnavailable` when the
    /// ledger cannot be written.
    pub async fn append_event(
        &self,
        project_id: &str,
        kind: EventKind,
        payload: serde_json::Value,
    ) -> Result<TimelineEvent, DatabaseError> {
        let (_gate, tx) = self.db().begin().await?;
        let result = async {
            require_project(&tx, project_id).await?;
            append_in(&tx, project_id, kind, &payload, Utc::now()).await
        }
        .await;
        finish(tx, result).await
    }

    /// All events of a project in `seq` order.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn read_timeline(&self, project_id: &str) -> Result<Vec<TimelineEvent>, DatabaseError> {
        let _gate = self.db().lock().await;
        require_project(self.db().conn(), project_id).await?;
        read_in(self.db().conn(), project_id).await
    }
}
