//! Schedule manifest — the JSON hand-off file read by the companion generators.
//!
//! Layout matches what the certificate script expects:
//! `[{ "trainingDate": "MM/DD/YYYY", "certDate": "MM/DD/YYYY", "isFirst": bool }]`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::staff::StaffIdentity;
use crate::schedule::builder::TrainingEvent;
use crate::schedule::dates::format_us;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub training_date: String,
    pub cert_date: String,
    pub is_first: bool,
}

impl From<&TrainingEvent> for ScheduleRow {
    fn from(event: &TrainingEvent) -> Self {
        Self {
            training_date: format_us(event.training_date),
            cert_date: format_us(event.certificate_date),
            is_first: event.is_first,
        }
    }
}

pub fn to_rows(events: &[TrainingEvent]) -> Vec<ScheduleRow> {
    events.iter().map(ScheduleRow::from).collect()
}

/// `<dir>/<safe_name>_rows.json`
pub fn manifest_path(dir: &Path, staff: &StaffIdentity) -> PathBuf {
    dir.join(format!("{}_rows.json", staff.safe_name))
}

/// Writes the manifest as pretty JSON and returns its path.
pub async fn write_manifest(
    dir: &Path,
    staff: &StaffIdentity,
    events: &[TrainingEvent],
) -> Result<PathBuf> {
    let path = manifest_path(dir, staff);
    let json = serde_json::to_vec_pretty(&to_rows(events))
        .context("Failed to serialize schedule manifest")?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write schedule manifest {}", path.display()))?;
    Ok(path)
}

pub async fn read_manifest(path: &Path) -> Result<Vec<ScheduleRow>> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read schedule manifest {}", path.display()))?;
    serde_json::from_slice(&raw).context("Schedule manifest is not valid JSON")
}

/// Deletes the manifest. A manifest that is already gone is not an error.
pub async fn remove_manifest(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e)
            .with_context(|| format!("Failed to remove schedule manifest {}", path.display())),
    }
}
