//! Workflow repository: stage transitions with optimistic concurrency.
//!
//! A transition commits three writes in one transaction: the version CAS on
//! `projects`, a `workflow_history` row and a timeline event. A lost CAS or
//! a failed ledger append rolls all of them back.

use chrono::Utc;
use sima_core::entities::{HistoryEntry, Project, WorkflowState};
use sima_core::enums::{Decision, EventKind, Stage};
use sima_core::errors::CoreError;
use sima_core::payloads::{AdvancePayload, ReopenPayload};
use sima_core::requests::{AdvanceRequest, ReopenRequest, require_attribution};
use sima_core::responses::AdvanceResponse;
use sima_core::workflow::{ScoreGate, Transition};

use crate::error::DatabaseError;
use crate::finish;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_stage};
use crate::repos::project::require_project;
use crate::repos::score::fetch_report;
use crate::repos::timeline::append_in;
use crate::retry::with_retry;
use crate::service::SimaService;

const SELECT_COLS: &str = "seq, from_stage, to_stage, actor, comment, decision, version, at";

fn row_to_history(row: &libsql::Row) -> Result<HistoryEntry, DatabaseError> {
    Ok(HistoryEntry {
        seq: row.get(0)?,
        from_stage: get_opt_string(row, 1)?
            .map(|s| parse_stage(&s))
            .transpose()?,
        to_stage: parse_stage(&row.get::<String>(2)?)?,
        actor: row.get(3)?,
        comment: row.get(4)?,
        decision: get_opt_string(row, 5)?
            .map(|s| parse_enum::<Decision>(&s))
            .transpose()?,
        version: row.get(6)?,
        at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// Append a history row; `entry.seq` is ignored and assigned here.
pub(crate) async fn insert_history_in(
    conn: &libsql::Connection,
    project_id: &str,
    entry: &HistoryEntry,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "INSERT INTO workflow_history
                 (project_id, seq, from_stage, to_stage, actor, comment, decision, version, at)
             SELECT ?1, COALESCE(MAX(seq), 0) + 1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
             FROM workflow_history WHERE project_id = ?1
             RETURNING seq",
            libsql::params![
                project_id,
                entry.from_stage.as_ref().map(Stage::as_str),
                entry.to_stage.as_str(),
                entry.actor.as_str(),
                entry.comment.as_str(),
                entry.decision.map(Decision::as_str),
                entry.version,
                entry.at.to_rfc3339()
            ],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get(0)?)
}

async fn history_in(
    conn: &libsql::Connection,
    project_id: &str,
) -> Result<Vec<HistoryEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM workflow_history WHERE project_id = ?1 ORDER BY seq"
            ),
            [project_id],
        )
        .await?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_history(&row)?);
    }
    Ok(entries)
}

async fn decision_recorded(
    conn: &libsql::Connection,
    project_id: &str,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM workflow_history
                           WHERE project_id = ?1 AND decision IS NOT NULL)",
            [project_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)? != 0)
}

/// One requested move, already attributed.
struct Move<'a> {
    project_id: &'a str,
    expected_version: i64,
    actor: &'a str,
    comment: &'a str,
    transition: Transition,
}

impl SimaService {
    /// Move a project one stage forward, or to `rejected`.
    ///
    /// Checks run in order: `NotFound`, `Validation` (blank actor or
    /// comment), `InvalidTransition` (terminal stage), `StaleVersion`, then
    /// the transition rules.
    ///
    /// # Errors
    ///
    /// See above; `LedgerUnavailable` if the timeline cannot be written.
    pub async fn advance(
        &self,
        project_id: &str,
        request: &AdvanceRequest,
    ) -> Result<AdvanceResponse, DatabaseError> {
        self.transition(Move {
            project_id,
            expected_version: request.expected_version,
            actor: &request.actor,
            comment: &request.comment,
            transition: Transition::Advance {
                decision: request.decision,
            },
        })
        .await
    }

    /// Send a non-terminal project back to the initial review stage.
    ///
    /// # Errors
    ///
    /// Same classes as [`Self::advance`].
    pub async fn reopen(
        &self,
        project_id: &str,
        request: &ReopenRequest,
    ) -> Result<AdvanceResponse, DatabaseError> {
        self.transition(Move {
            project_id,
            expected_version: request.expected_version,
            actor: &request.actor,
            comment: &request.comment,
            transition: Transition::Reopen,
        })
        .await
    }

    /// Advance against the latest version, re-reading and retrying when
    /// another reviewer wins the race.
    ///
    /// # Errors
    ///
    /// See [`SimaService::advance_from`].
    pub async fn advance_latest(
        &self,
        project_id: &str,
        actor: &str,
        comment: &str,
        decision: Option<Decision>,
    ) -> Result<AdvanceResponse, DatabaseError> {
        let observed = self.get_project(project_id).await?;
        self.advance_from(&observed, actor, comment, decision).await
    }

    /// Advance a project the caller has already read.
    ///
    /// The stage in `observed` is pinned: a lost version race is retried only
    /// while a re-read still shows that stage, so the caller's decision is
    /// never applied to a stage they did not review.
    ///
    /// # Errors
    ///
    /// `StaleVersion` when the stage moved or the configured attempts are
    /// spent; any other error immediately.
    pub async fn advance_from(
        &self,
        observed: &Project,
        actor: &str,
        comment: &str,
        decision: Option<Decision>,
    ) -> Result<AdvanceResponse, DatabaseError> {
        let project_id = observed.id.as_str();
        let mut expected_version = observed.version;
        let mut attempt = 1;
        loop {
            let request = AdvanceRequest {
                expected_version,
                actor: actor.to_string(),
                comment: comment.to_string(),
                decision,
            };
            match self.advance(project_id, &request).await {
                Err(DatabaseError::Domain(CoreError::StaleVersion { .. }))
                    if attempt < self.advance_attempts() =>
                {
                    let current = self.get_project(project_id).await?;
                    if current.stage != observed.stage {
                        tracing::info!(
                            project_id,
                            observed = %observed.stage,
                            current = %current.stage,
                            "stage moved since it was read, not retrying advance"
                        );
                        return Err(CoreError::StaleVersion {
                            project_id: project_id.to_string(),
                            expected: expected_version,
                            actual: current.version,
                        }
                        .into());
                    }
                    tracing::debug!(project_id, attempt, "version moved, retrying advance");
                    expected_version = current.version;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Current stage, version and full history.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn workflow_state(&self, project_id: &str) -> Result<WorkflowState, DatabaseError> {
        let _gate = self.db().lock().await;
        let conn = self.db().conn();
        let project = require_project(conn, project_id).await?;
        let history = history_in(conn, project_id).await?;
        Ok(WorkflowState {
            project_id: project.id,
            stage: project.stage,
            version: project.version,
            history,
        })
    }

    async fn transition(&self, mv: Move<'_>) -> Result<AdvanceResponse, DatabaseError> {
        let mv = &mv;
        with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = self.transition_in(&tx, mv).await;
            finish(tx, result).await
        })
        .await
    }

    async fn transition_in(
        &self,
        conn: &libsql::Connection,
        mv: &Move<'_>,
    ) -> Result<AdvanceResponse, DatabaseError> {
        let project = require_project(conn, mv.project_id).await?;
        require_attribution(mv.actor, mv.comment)?;
        if project.stage.is_terminal() {
            return Err(CoreError::InvalidTransition {
                project_id: project.id,
                from: project.stage.to_string(),
                reason: "terminal stage is absorbing".into(),
            }
            .into());
        }
        if project.version != mv.expected_version {
            return Err(stale(&project, mv.expected_version));
        }

        let gate = self.score_gate(conn, &project).await?;
        let next = self
            .plan()
            .apply(&project.id, &project.stage, mv.transition, gate)?;

        let now = Utc::now();
        let changed = conn
            .execute(
                "UPDATE projects SET stage = ?1, version = version + 1, updated_at = ?2
                 WHERE id = ?3 AND version = ?4",
                libsql::params![
                    next.as_str(),
                    now.to_rfc3339(),
                    project.id.as_str(),
                    mv.expected_version
                ],
            )
            .await?;
        if changed == 0 {
            let actual = require_project(conn, mv.project_id).await?;
            return Err(stale(&actual, mv.expected_version));
        }
        let version = mv.expected_version + 1;

        let decision = match mv.transition {
            Transition::Advance { decision } => decision,
            Transition::Reopen => None,
        };
        insert_history_in(
            conn,
            &project.id,
            &HistoryEntry {
                seq: 0,
                from_stage: Some(project.stage.clone()),
                to_stage: next.clone(),
                actor: mv.actor.to_string(),
                comment: mv.comment.to_string(),
                decision,
                version,
                at: now,
            },
        )
        .await?;

        match mv.transition {
            Transition::Advance { decision } => {
                let payload = AdvancePayload {
                    actor: mv.actor.to_string(),
                    from: project.stage.clone(),
                    to: next.clone(),
                    decision,
                    comment: mv.comment.to_string(),
                    version,
                };
                append_in(conn, &project.id, EventKind::Advance, &payload, now).await?;
            }
            Transition::Reopen => {
                let payload = ReopenPayload {
                    actor: mv.actor.to_string(),
                    from: project.stage.clone(),
                    to: next.clone(),
                    comment: mv.comment.to_string(),
                    version,
                };
                append_in(conn, &project.id, EventKind::Reopen, &payload, now).await?;
            }
        }

        tracing::info!(
            project_id = %project.id,
            from = %project.stage,
            to = %next,
            version,
            actor = mv.actor,
            "stage transition committed"
        );
        Ok(AdvanceResponse {
            stage: next,
            version,
        })
    }

    async fn score_gate(
        &self,
        conn: &libsql::Connection,
        project: &Project,
    ) -> Result<ScoreGate, DatabaseError> {
        let status = if project.score_version > 0 {
            fetch_report(conn, &project.id, project.score_version)
                .await?
                .map(|r| r.status)
        } else {
            None
        };
        let recorded = decision_recorded(conn, &project.id).await?;
        Ok(ScoreGate::for_status(status, recorded))
    }
}

fn stale(project: &Project, expected: i64) -> DatabaseError {
    CoreError::StaleVersion {
        project_id: project.id.clone(),
        expected,
        actual: project.version,
    }
    .into()
}
