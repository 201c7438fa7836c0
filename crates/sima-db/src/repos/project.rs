//! Project repository: registration, lookup and listing.

use chrono::{DateTime, Utc};
use sima_core::entities::{HistoryEntry, NewProject, Project, SnapshotMeta};
use sima_core::enums::Stage;
use sima_core::errors::CoreError;
use sima_core::ids::{PREFIX_PROJECT, is_valid_project_id, tracking_number};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_optional_json, parse_stage};
use crate::repos::workflow::insert_history_in;
use crate::retry::with_retry;
use crate::service::SimaService;
use crate::{finish, generate_id, random_suffix};

pub(crate) const SELECT_COLS: &str = "id, tracking_no, title, region, city, function, stage, \
     version, snapshot_rev, score_version, latest_snapshot, created_at, updated_at";

pub(crate) fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        tracking_no: row.get(1)?,
        title: get_opt_string(row, 2)?,
        region: get_opt_string(row, 3)?,
        city: get_opt_string(row, 4)?,
        function: get_opt_string(row, 5)?,
        stage: parse_stage(&row.get::<String>(6)?)?,
        version: row.get(7)?,
        snapshot_rev: row.get(8)?,
        score_version: row.get(9)?,
        latest_snapshot: parse_optional_json(get_opt_string(row, 10)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

pub(crate) async fn fetch_project(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Project>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_project(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn require_project(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Project, DatabaseError> {
    fetch_project(conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found("project", id).into())
}

/// Insert a fresh project at `stage` with its creation history entry.
pub(crate) async fn create_in(
    conn: &libsql::Connection,
    initial: &Stage,
    id: &str,
    meta: &SnapshotMeta,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<Project, DatabaseError> {
    let suffix = random_suffix(conn).await?;
    let project = Project {
        id: id.to_string(),
        tracking_no: tracking_number(now.date_naive(), &suffix),
        title: meta.title.clone(),
        region: meta.region.clone(),
        city: meta.city.clone(),
        function: meta.function.clone(),
        stage: initial.clone(),
        version: 0,
        snapshot_rev: 0,
        score_version: 0,
        latest_snapshot: None,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        &format!(
            "INSERT INTO projects ({SELECT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL, ?11, ?12)"
        ),
        libsql::params![
            project.id.as_str(),
            project.tracking_no.as_str(),
            project.title.as_deref(),
            project.region.as_deref(),
            project.city.as_deref(),
            project.function.as_deref(),
            project.stage.as_str(),
            project.version,
            project.snapshot_rev,
            project.score_version,
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;

    insert_history_in(
        conn,
        &project.id,
        &HistoryEntry {
            seq: 0,
            from_stage: None,
            to_stage: project.stage.clone(),
            actor: actor.to_string(),
            comment: "project created".into(),
            decision: None,
            version: 0,
            at: now,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, tracking_no = %project.tracking_no, stage = %project.stage, "project created");
    Ok(project)
}

impl SimaService {
    /// Register a project ahead of its first upload.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank title or actor.
    pub async fn register_project(
        &self,
        new: NewProject,
        actor: &str,
    ) -> Result<Project, DatabaseError> {
        if new.title.trim().is_empty() {
            return Err(CoreError::Validation("title must not be empty".into()).into());
        }
        if actor.trim().is_empty() {
            return Err(CoreError::Validation("actor must not be empty".into()).into());
        }
        let meta = SnapshotMeta {
            title: Some(new.title),
            region: new.region,
            city: new.city,
            function: new.function,
        };

        let meta = &meta;
        with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = async {
                let id = generate_id(&tx, PREFIX_PROJECT).await?;
                create_in(&tx, &self.plan().initial(), &id, meta, actor, Utc::now()).await
            }
            .await;
            finish(tx, result).await
        })
        .await
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let _gate = self.db().lock().await;
        require_project(self.db().conn(), id).await
    }

    /// Most recently updated projects first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_projects(&self, limit: u32) -> Result<Vec<Project>, DatabaseError> {
        let _gate = self.db().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM projects ORDER BY updated_at DESC, id LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }
}

/// Reject project IDs that are not usable as URL path segments.
pub(crate) fn check_project_id(id: &str) -> Result<(), DatabaseError> {
    if is_valid_project_id(id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "project id '{id}' must be 1-64 chars of [A-Za-z0-9_-]"
        ))
        .into())
    }
}
