//! Certificate issuer.
//!
//! One certificate per `(project_id, score_version)`. Issuing is idempotent:
//! a repeated request returns the stored row, and the loser of an insert race
//! reads the winner's row. Only the winning insert writes the timeline event.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sima_core::entities::{Certificate, ScoreReport};
use sima_core::enums::{EventKind, Stage};
use sima_core::errors::CoreError;
use sima_core::ids::PREFIX_CERTIFICATE;
use sima_core::payloads::CertificateIssuedPayload;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_json, to_json};
use crate::repos::project::require_project;
use crate::repos::score::current_report;
use crate::repos::timeline::append_in;
use crate::retry::with_retry;
use crate::service::SimaService;
use crate::{finish, generate_id};

const SELECT_COLS: &str =
    "id, project_id, score_version, report, issued_by, issued_at, verification_token";

fn row_to_certificate(row: &libsql::Row) -> Result<Certificate, DatabaseError> {
    Ok(Certificate {
        id: row.get(0)?,
        project_id: row.get(1)?,
        score_version: row.get(2)?,
        report: parse_json(&row.get::<String>(3)?)?,
        issued_by: row.get(4)?,
        issued_at: parse_datetime(&row.get::<String>(5)?)?,
        verification_token: row.get(6)?,
    })
}

/// Lowercase hex SHA-256 over the certificate identity and embedded report.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the report cannot be serialized.
pub fn verification_token(
    id: &str,
    project_id: &str,
    issued_by: &str,
    issued_at: DateTime<Utc>,
    report: &ScoreReport,
) -> Result<String, DatabaseError> {
    let at = issued_at.to_rfc3339();
    let mut hasher = Sha256::new();
    for part in [id, project_id, issued_by, at.as_str()] {
        hasher.update(part.as_bytes());
        hasher.update(b"\n");
    }
    hasher.update(report.score_version.to_string().as_bytes());
    hasher.update(b"\n");
    hasher.update(to_json(report)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

async fn query_one(
    conn: &libsql::Connection,
    filter: &str,
    params: impl libsql::params::IntoParams,
) -> Result<Option<Certificate>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM certificates WHERE {filter}"),
            params,
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_certificate(&row)?)),
        None => Ok(None),
    }
}

async fn fetch_for_version(
    conn: &libsql::Connection,
    project_id: &str,
    score_version: i64,
) -> Result<Option<Certificate>, DatabaseError> {
    query_one(
        conn,
        "project_id = ?1 AND score_version = ?2",
        libsql::params![project_id, score_version],
    )
    .await
}

impl SimaService {
    /// Issue (or return) the certificate for an approved project's current
    /// report.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project, `NotApproved` unless the stage is
    /// `approved`, `Validation` if the project has no score report,
    /// `LedgerUnavailable` if the issuance cannot be logged.
    pub async fn issue_certificate(
        &self,
        project_id: &str,
        actor: &str,
    ) -> Result<Certificate, DatabaseError> {
        if actor.trim().is_empty() {
            return Err(CoreError::Validation("actor must not be empty".into()).into());
        }
        with_retry(self.retry(), || async move {
            let (_gate, tx) = self.db().begin().await?;
            let result = issue_in(&tx, project_id, actor).await;
            finish(tx, result).await
        })
        .await
    }

    /// Look up a certificate by token and check the token still matches its
    /// contents.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown token, `Validation` if the stored
    /// certificate no longer hashes to it.
    pub async fn verify_certificate(&self, token: &str) -> Result<Certificate, DatabaseError> {
        let _gate = self.db().lock().await;
        let cert = query_one(self.db().conn(), "verification_token = ?1", [token])
            .await?
            .ok_or_else(|| CoreError::not_found("certificate", token))?;
        let expected = verification_token(
            &cert.id,
            &cert.project_id,
            &cert.issued_by,
            cert.issued_at,
            &cert.report,
        )?;
        if expected != cert.verification_token {
            tracing::warn!(certificate_id = %cert.id, "certificate failed verification");
            return Err(CoreError::Validation(format!(
                "certificate {} does not match its verification token",
                cert.id
            ))
            .into());
        }
        Ok(cert)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown certificate id.
    pub async fn get_certificate(&self, id: &str) -> Result<Certificate, DatabaseError> {
        let _gate = self.db().lock().await;
        query_one(self.db().conn(), "id = ?1", [id])
            .await?
            .ok_or_else(|| CoreError::not_found("certificate", id).into())
    }

    /// All certificates of a project, oldest score version first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub async fn list_certificates(
        &self,
        project_id: &str,
    ) -> Result<Vec<Certificate>, DatabaseError> {
        let _gate = self.db().lock().await;
        let conn = self.db().conn();
        require_project(conn, project_id).await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM certificates WHERE project_id = ?1 ORDER BY score_version"
                ),
                [project_id],
            )
            .await?;
        let mut certs = Vec::new();
        while let Some(row) = rows.next().await? {
            certs.push(row_to_certificate(&row)?);
        }
        Ok(certs)
    }
}

async fn issue_in(
    conn: &libsql::Connection,
    project_id: &str,
    actor: &str,
) -> Result<Certificate, DatabaseError> {
    let project = require_project(conn, project_id).await?;
    if project.stage != Stage::Approved {
        return Err(CoreError::NotApproved {
            project_id: project.id,
            stage: project.stage.to_string(),
        }
        .into());
    }
    let report = current_report(conn, project_id).await?.ok_or_else(|| {
        CoreError::Validation(format!("project {project_id} has no score report to certify"))
    })?;

    if let Some(existing) = fetch_for_version(conn, project_id, report.score_version).await? {
        tracing::debug!(project_id, certificate_id = %existing.id, "certificate already issued");
        return Ok(existing);
    }

    let id = generate_id(conn, PREFIX_CERTIFICATE).await?;
    let issued_at = Utc::now();
    let token = verification_token(&id, project_id, actor, issued_at, &report)?;
    let inserted = conn
        .execute(
            &format!(
                "INSERT INTO certificates ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(project_id, score_version) DO NOTHING"
            ),
            libsql::params![
                id.as_str(),
                project_id,
                report.score_version,
                to_json(&report)?,
                actor,
                issued_at.to_rfc3339(),
                token.as_str()
            ],
        )
        .await?;

    if inserted == 0 {
        return fetch_for_version(conn, project_id, report.score_version)
            .await?
            .ok_or(DatabaseError::NoResult);
    }

    let payload = CertificateIssuedPayload {
        certificate_id: id.clone(),
        score_version: report.score_version,
        verification_token: token.clone(),
        actor: actor.to_string(),
    };
    append_in(conn, project_id, EventKind::CertificateIssued, &payload, issued_at).await?;
    tracing::info!(
        project_id,
        certificate_id = %id,
        score_version = report.score_version,
        "certificate issued"
    );

    Ok(Certificate {
        id,
        project_id: project_id.to_string(),
        score_version: report.score_version,
        report,
        issued_by: actor.to_string(),
        issued_at,
        verification_token: token,
    })
}
