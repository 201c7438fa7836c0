//! Score repository: snapshot upload, analysis and immutable score reports.
//!
//! Scoring runs between two short transactions so a slow scorer never holds
//! the connection. The second transaction only swaps in the new report if
//! the snapshot it scored is still the current one.

use chrono::{DateTime, Utc};
use sima_core::entities::{ProjectSnapshot, ScoreReport, SubScores};
use sima_core::enums::{EventKind, ScoreStatus};
use sima_core::errors::{CoreError, DimensionFailure};
use sima_core::payloads::{AnalysisPayload, UploadPayload};
use sima_core::responses::{AnalysisResponse, ImprovementResponse, UploadOutcome};
use sima_score::{aggregate, suggest_improvements};

use crate::error::DatabaseError;
use crate::finish;
use crate::helpers::{parse_datetime, parse_enum, to_json};
use crate::repos::project::{check_project_id, create_in, fetch_project, require_project};
use crate::repos::timeline::append_in;
use crate::retry::with_retry;
use crate::service::SimaService;

const SELECT_COLS: &str = "project_id, score_version, snapshot_rev, identity, climate, context, \
     function, human, total, status, computed_at";

fn row_to_report(row: &libsql::Row) -> Result<ScoreReport, DatabaseError> {
    Ok(ScoreReport {
        project_id: row.get(0)?,
        score_version: row.get(1)?,
        snapshot_rev: row.get(2)?,
        scores: SubScores {
            identity: row.get(3)?,
            climate: row.get(4)?,
            context: row.get(5)?,
            function: row.get(6)?,
            human: row.get(7)?,
        },
        total: row.get(8)?,
        status: parse_enum::<ScoreStatus>(&row.get::<String>(9)?)?,
        computed_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

pub(crate) async fn fetch_report(
    conn: &libsql::Connection,
    project_id: &str,
    score_version: i64,
) -> Result<Option<ScoreReport>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM score_reports WHERE project_id = ?1 AND score_version = ?2"
            ),
            libsql::params![project_id, score_version],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_report(&row)?)),
        None => Ok(None),
    }
}

/// The report `projects.score_version` points at, if any.
pub(crate) async fn current_report(
    conn: &libsql::Connection,
    project_id: &str,
) -> Result<Option<ScoreReport>, DatabaseError> {
    let project = require_project(conn, project_id).await?;
    if project.score_version == 0 {
        return Ok(None);
    }
    fetch_report(conn, project_id, project.score_version).await
}

async fn insert_report(conn: &libsql::Connection, report: &ScoreReport) -> Result<(), DatabaseError> {
    conn.execute(
        &format!(
            "INSERT INTO score_reports ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        libsql::params![
            report.project_id.as_str(),
            report.score_version,
            report.snapshot_rev,
            report.scores.identity,
            report.scores.climate,
            report.scores.context,
            report.scores.function,
            report.scores.human,
            report.total,
            report.status.as_str(),
            report.computed_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

/// Result of running the scorer over one snapshot revision.
enum Verdict {
    Scored(SubScores),
    Partial(Vec<DimensionFailure>),
}

impl Verdict {
    fn evaluate(svc: &SimaService, project_id: &str, snapshot: &ProjectSnapshot) -> Result<Self, DatabaseError> {
        match svc.scorer().evaluate(snapshot).into_sub_scores(project_id) {
            Ok(scores) => Ok(Self::Scored(scores)),
            Err(CoreError::PartialScore { failed, .. }) => Ok(Self::Partial(failed)),
            Err(other) => Err(other.into()),
        }
    }
}

impl SimaService {
    /// Store a new snapshot and score it.
    ///
    /// Creates the project on first upload, with its metadata taken from
    /// `snapshot.meta`. A snapshot that some dimensions cannot score is
    /// stored and logged, but leaves the current report in place; the
    /// failed dimensions come back in [`UploadOutcome::failed`].
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed project id or blank actor,
    /// `LedgerUnavailable` if the timeline cannot be written.
    pub async fn upload(
        &self,
        project_id: &str,
        snapshot: &ProjectSnapshot,
        actor: &str,
    ) -> Result<UploadOutcome, DatabaseError> {
        check_project_id(project_id)?;
        if actor.trim().is_empty() {
            return Err(CoreError::Validation("actor must not be empty".into()).into());
        }

        let rev = with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = self.store_snapshot_in(&tx, project_id, snapshot, actor).await;
            finish(tx, result).await
        })
        .await?;

        let verdict = Verdict::evaluate(self, project_id, snapshot)?;
        let verdict = &verdict;
        with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = record_in(&tx, self, project_id, rev, verdict, Utc::now()).await;
            finish(tx, result).await
        })
        .await
    }

    /// Re-score the stored snapshot.
    ///
    /// Every analysis that completes yields a new `score_version`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project, `Validation` if nothing has been
    /// uploaded yet, `PartialScore` if any dimension fails. The failed
    /// attempt is still recorded on the timeline.
    pub async fn analyze(&self, project_id: &str) -> Result<UploadOutcome, DatabaseError> {
        let project = self.get_project(project_id).await?;
        let snapshot = project.latest_snapshot.ok_or_else(|| {
            CoreError::Validation(format!("project {project_id} has no uploaded snapshot"))
        })?;
        let rev = project.snapshot_rev;

        let verdict = Verdict::evaluate(self, project_id, &snapshot)?;
        let verdict = &verdict;
        let outcome = with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = record_in(&tx, self, project_id, rev, verdict, Utc::now()).await;
            finish(tx, result).await
        })
        .await?;

        if outcome.failed.is_empty() {
            Ok(outcome)
        } else {
            Err(CoreError::PartialScore {
                project_id: project_id.to_string(),
                failed: outcome.failed,
            }
            .into())
        }
    }

    /// The current report.
    ///
    /// # Errors
    ///
    /// `NotFound` when the project is unknown or has never been scored.
    pub async fn latest_score(&self, project_id: &str) -> Result<ScoreReport, DatabaseError> {
        let _gate = self.db().lock().await;
        current_report(self.db().conn(), project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("score_report", project_id).into())
    }

    /// Every report ever computed for a project, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn score_history(&self, project_id: &str) -> Result<Vec<ScoreReport>, DatabaseError> {
        let _gate = self.db().lock().await;
        let conn = self.db().conn();
        require_project(conn, project_id).await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM score_reports WHERE project_id = ?1 ORDER BY score_version"
                ),
                [project_id],
            )
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next().await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Project (with its stored snapshot) and current report.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn analysis(&self, project_id: &str) -> Result<AnalysisResponse, DatabaseError> {
        let _gate = self.db().lock().await;
        let conn = self.db().conn();
        let project = require_project(conn, project_id).await?;
        let report = current_report(conn, project_id).await?;
        Ok(AnalysisResponse { project, report })
    }

    /// Ranked suggestions for raising the current total.
    ///
    /// # Errors
    ///
    /// `NotFound` when the project is unknown or unscored.
    pub async fn improvements(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<ImprovementResponse, DatabaseError> {
        let report = self.latest_score(project_id).await?;
        Ok(ImprovementResponse {
            project_id: report.project_id.clone(),
            total: report.total,
            status: report.status,
            suggestions: suggest_improvements(&report.scores, self.weights(), limit),
        })
    }

    async fn store_snapshot_in(
        &self,
        conn: &libsql::Connection,
        project_id: &str,
        snapshot: &ProjectSnapshot,
        actor: &str,
    ) -> Result<i64, DatabaseError> {
        let now = Utc::now();
        let created = match fetch_project(conn, project_id).await? {
            Some(_) => false,
            None => {
                create_in(conn, &self.plan().initial(), project_id, &snapshot.meta, actor, now)
                    .await?;
                true
            }
        };

        let meta = &snapshot.meta;
        conn.execute(
            "UPDATE projects SET
                 snapshot_rev = snapshot_rev + 1,
                 latest_snapshot = ?1,
                 title = COALESCE(?2, title),
                 region = COALESCE(?3, region),
                 city = COALESCE(?4, city),
                 function = COALESCE(?5, function),
                 updated_at = ?6
             WHERE id = ?7",
            libsql::params![
                to_json(snapshot)?,
                meta.title.as_deref(),
                meta.region.as_deref(),
                meta.city.as_deref(),
                meta.function.as_deref(),
                now.to_rfc3339(),
                project_id
            ],
        )
        .await?;
        let rev = require_project(conn, project_id).await?.snapshot_rev;

        let payload = UploadPayload {
            actor: actor.to_string(),
            files: snapshot.files.clone(),
            snapshot_rev: rev,
            created,
        };
        append_in(conn, project_id, EventKind::Upload, &payload, now).await?;
        tracing::info!(project_id, snapshot_rev = rev, created, "snapshot stored");
        Ok(rev)
    }
}

/// Record the verdict for snapshot `rev`, unless a newer snapshot landed
/// while it was being scored.
async fn record_in(
    conn: &libsql::Connection,
    svc: &SimaService,
    project_id: &str,
    rev: i64,
    verdict: &Verdict,
    now: DateTime<Utc>,
) -> Result<UploadOutcome, DatabaseError> {
    let project = require_project(conn, project_id).await?;
    if project.snapshot_rev != rev {
        tracing::info!(
            project_id,
            scored_rev = rev,
            current_rev = project.snapshot_rev,
            "analysis superseded by a newer snapshot"
        );
        return Ok(UploadOutcome {
            project,
            report: None,
            failed: Vec::new(),
            superseded: true,
        });
    }

    match verdict {
        Verdict::Scored(scores) => {
            let agg = aggregate(scores, svc.weights());
            let report = ScoreReport {
                project_id: project_id.to_string(),
                score_version: project.score_version + 1,
                snapshot_rev: rev,
                scores: *scores,
                total: agg.total,
                status: agg.status,
                computed_at: now,
            };
            insert_report(conn, &report).await?;
            conn.execute(
                "UPDATE projects SET score_version = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![report.score_version, now.to_rfc3339(), project_id],
            )
            .await?;

            let payload = AnalysisPayload {
                snapshot_rev: rev,
                complete: true,
                score_version: Some(report.score_version),
                total: Some(report.total),
                status: Some(report.status),
                failed: Vec::new(),
            };
            append_in(conn, project_id, EventKind::Analysis, &payload, now).await?;
            tracing::info!(
                project_id,
                score_version = report.score_version,
                total = report.total,
                status = %report.status,
                "score report recorded"
            );
            Ok(UploadOutcome {
                project: require_project(conn, project_id).await?,
                report: Some(report),
                failed: Vec::new(),
                superseded: false,
            })
        }
        Verdict::Partial(failed) => {
            let payload = AnalysisPayload {
                snapshot_rev: rev,
                complete: false,
                score_version: None,
                total: None,
                status: None,
                failed: failed.clone(),
            };
            append_in(conn, project_id, EventKind::Analysis, &payload, now).await?;
            tracing::warn!(project_id, snapshot_rev = rev, failed = failed.len(), "partial analysis");
            Ok(UploadOutcome {
                project,
                report: None,
                failed: failed.clone(),
                superseded: false,
            })
        }
    }
}
