//! ID prefixes and project identifier helpers.
//!
//! Generated IDs have the form `{prefix}-{8 hex chars}` (see
//! `SimaDb::generate_id`). Project IDs arriving from callers are opaque but
//! must be URL-safe.

use chrono::NaiveDate;

pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_CERTIFICATE: &str = "crt";

pub const ALL_PREFIXES: [&str; 2] = [PREFIX_PROJECT, PREFIX_CERTIFICATE];

/// Maximum accepted length of a caller-supplied project ID.
pub const MAX_PROJECT_ID_LEN: usize = 64;

/// Human-facing tracking number, e.g. `SIMA-20260214-a3f8b2c1`.
#[must_use]
pub fn tracking_number(date: NaiveDate, suffix: &str) -> String {
    format!("SIMA-{}-{suffix}", date.format("%Y%m%d"))
}

/// Whether `id` is usable as an opaque project key.
#[must_use]
pub fn is_valid_project_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_PROJECT_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
