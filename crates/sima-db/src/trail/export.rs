//! JSONL export of a project's timeline.
//!
//! Uses `serde_jsonlines::write_json_lines`, so every export replaces the
//! file with a full, ordered copy. Events are checked against the schema
//! registry on the way out; mismatches are logged, never fatal.

use std::path::Path;

use sima_core::entities::TimelineEvent;
use sima_core::enums::EventKind;
use sima_schema::SchemaRegistry;

use crate::error::DatabaseError;
use crate::service::SimaService;

impl SimaService {
    /// Write the project's timeline to `path` as JSON Lines.
    ///
    /// Returns the number of events written.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project, `DatabaseError::Other` if the file
    /// cannot be written.
    pub async fn export_timeline_jsonl(
        &self,
        project_id: &str,
        path: &Path,
    ) -> Result<usize, DatabaseError> {
        let events = self.read_timeline(project_id).await?;
        for event in &events {
            check_event(self.schema(), event);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
            }
        }
        serde_jsonlines::write_json_lines(path, &events)
            .map_err(|e| DatabaseError::Other(e.into()))?;

        tracing::info!(project_id, events = events.len(), path = %path.display(), "timeline exported");
        Ok(events.len())
    }
}

/// Read an exported trail back.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if the file cannot be read or a line is not
/// a timeline event.
pub fn read_trail(path: &Path) -> Result<Vec<TimelineEvent>, DatabaseError> {
    serde_jsonlines::json_lines(path)
        .map_err(|e| DatabaseError::Other(e.into()))?
        .collect::<std::io::Result<Vec<TimelineEvent>>>()
        .map_err(|e| DatabaseError::Other(e.into()))
}

fn check_event(schema: &SchemaRegistry, event: &TimelineEvent) {
    let envelope = match serde_json::to_value(event) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(project_id = %event.project_id, seq = event.seq, error = %e, "unserializable timeline event");
            return;
        }
    };
    if let Err(e) = schema.validate("timeline_event", &envelope) {
        tracing::warn!(project_id = %event.project_id, seq = event.seq, error = ?e, "timeline event failed validation");
    }
    if let Err(e) = schema.validate(payload_schema_name(event.kind), &event.payload) {
        tracing::warn!(
            project_id = %event.project_id,
            seq = event.seq,
            kind = %event.kind,
            error = ?e,
            "timeline payload failed validation"
        );
    }
}

const fn payload_schema_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Upload => "upload_payload",
        EventKind::Analysis => "analysis_payload",
        EventKind::Advance => "advance_payload",
        EventKind::Reopen => "reopen_payload",
        EventKind::CertificateIssued => "certificate_issued_payload",
    }
}
