//! Schedule document model and JSON parsing.
//!
//! The document comes from an external schedule oracle and is treated as
//! untrusted input. Only the top-level shape is enforced here: a `schedules`
//! array of room objects. Week bodies stay loosely typed so that malformed
//! nested values degrade individual checks instead of aborting the run.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Schedule of one room over the rotation cycle.
///
/// Week bodies are kept as raw JSON values; [`crate::models::assignment`]
/// interprets them leniently when flattening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSchedule {
    pub room: String,
    #[serde(default)]
    pub weeks: BTreeMap<String, serde_json::Value>,
}

/// Top-level schedule document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub schedules: Vec<RoomSchedule>,
    /// SHA-256 of the raw JSON, computed at parse time if absent.
    #[serde(default)]
    pub checksum: String,
}

/// Parse a schedule document from a JSON string.
///
/// Fails with [`EngineError::InvalidDocument`] only when the top-level
/// structure cannot be interpreted as a sequence of room objects. The error
/// message names the failing JSON path.
pub fn parse_schedule_json_str(json_str: &str) -> EngineResult<ScheduleDocument> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| EngineError::InvalidDocument(format!("invalid JSON: {e}")))?;

    if !value
        .get("schedules")
        .map(|s| s.is_array())
        .unwrap_or(false)
    {
        return Err(EngineError::InvalidDocument(
            "missing 'schedules' array of room objects".to_string(),
        ));
    }

    let mut document: ScheduleDocument = serde_path_to_error::deserialize(value)
        .map_err(|e| EngineError::InvalidDocument(format!("at {}: {}", e.path(), e.inner())))?;

    if document.checksum.is_empty() {
        document.checksum = compute_checksum(json_str);
    }

    log::debug!(
        "parsed schedule document with {} room(s), checksum {}",
        document.schedules.len(),
        document.checksum
    );
    Ok(document)
}

/// Parse a schedule document from a file.
pub fn parse_schedule_json(path: impl AsRef<Path>) -> EngineResult<ScheduleDocument> {
    let path = path.as_ref();
    let json_str = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_schedule_json_str(&json_str)
}

fn compute_checksum(json_str: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(json_str.as_bytes());
    hex::encode(hasher.finalize())
}
