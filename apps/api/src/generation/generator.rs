//! Document bundle generation — orchestrates the full pipeline for one staff member.
//!
//! Flow: validate → build_schedule → render training log → write manifest →
//!       certificates → pre/post tests → remove manifest → sort → base64.
//!
//! Every request runs in its own `Workspace`, removed whether the pipeline
//! succeeds or fails. Nothing is retried and no partial bundle is returned.

use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::companion::RenderContext;
use crate::generation::workspace::{EncodedFile, GeneratedFile, Workspace};
use crate::layout::{log_file_name, render_training_log};
use crate::models::{Agency, AgencyProfile, StaffIdentity};
use crate::schedule::dates::{normalize_optional, parse_date};
use crate::schedule::manifest::{remove_manifest, write_manifest};
use crate::schedule::{build_schedule, TrainingEvent};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for bundle generation. Every field is optional at the JSON
/// level so that missing fields surface as a 400 with a readable message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub agency: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub staff: StaffIdentity,
    pub hire_date: NaiveDate,
    pub separation_date: Option<NaiveDate>,
    pub agency: Agency,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub staff_name: String,
    pub agency: Agency,
    pub file_count: usize,
    pub files: Vec<EncodedFile>,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, AppError> {
        // Only endDate and agency treat "null" / "undefined" as absent; a name is
        // taken literally.
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let start = normalize_optional(self.start_date.as_deref());
        let (Some(name), Some(start)) = (name, start) else {
            return Err(AppError::Validation(
                "name and startDate are required".to_string(),
            ));
        };

        let hire_date = parse_date(start).ok_or_else(|| {
            AppError::Validation(format!(
                "startDate '{start}' is not a valid date (expected YYYY-MM-DD)"
            ))
        })?;

        let separation_date = match normalize_optional(self.end_date.as_deref()) {
            Some(end) => Some(parse_date(end).ok_or_else(|| {
                AppError::Validation(format!(
                    "endDate '{end}' is not a valid date (expected YYYY-MM-DD)"
                ))
            })?),
            None => None,
        };

        let agency = match normalize_optional(self.agency.as_deref()) {
            Some(raw) => raw.parse::<Agency>().map_err(AppError::Validation)?,
            None => Agency::default(),
        };

        Ok(ValidatedRequest {
            staff: StaffIdentity::new(name),
            hire_date,
            separation_date,
            agency,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline and returns the encoded bundle.
pub async fn generate_documents(
    state: &AppState,
    request: &ValidatedRequest,
) -> Result<GenerateResponse, AppError> {
    let started = Instant::now();
    let events = build_schedule(
        request.hire_date,
        request.separation_date,
        state.clock.today(),
    );
    info!(
        "Built schedule for {} ({}): {} events",
        request.staff.display_name,
        request.agency,
        events.len()
    );

    let workspace = Workspace::create()?;
    let result = run_pipeline(state, request, &events, &workspace).await;

    // Cleanup runs on both paths; a pipeline error takes precedence.
    let cleanup = workspace.close();
    let files = result?;
    cleanup?;

    info!(
        "Generated {} files for {} in {}ms",
        files.len(),
        request.staff.display_name,
        started.elapsed().as_millis()
    );

    Ok(GenerateResponse {
        staff_name: request.staff.display_name.clone(),
        agency: request.agency,
        file_count: files.len(),
        files: files.iter().map(EncodedFile::from).collect(),
    })
}

async fn run_pipeline(
    state: &AppState,
    request: &ValidatedRequest,
    events: &[TrainingEvent],
    workspace: &Workspace,
) -> Result<Vec<GeneratedFile>, AppError> {
    let profile = request.agency.profile();

    // Step 1: Training log
    let log = render_log(state, &request.staff, events, profile).await?;

    // Step 2: Hand-off manifest for the generators
    let manifest_path = write_manifest(workspace.path(), &request.staff, events).await?;
    let ctx = RenderContext {
        staff: &request.staff,
        profile,
        events,
        manifest_path: &manifest_path,
        scratch: workspace.path(),
    };

    // Step 3: Certificates
    let mut files = vec![log];
    files.extend(state.generators.render_certificates(&ctx).await?);

    // Step 4: Pre/post tests for the orientation event
    match events.first() {
        Some(first) => files.extend(state.generators.render_tests(&ctx, first).await?),
        None => warn!("Empty schedule; skipping pre/post tests"),
    }

    // Step 5: The manifest never leaves the workspace
    remove_manifest(&manifest_path).await?;

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

/// Renders the training log on the blocking pool under the log timeout.
async fn render_log(
    state: &AppState,
    staff: &StaffIdentity,
    events: &[TrainingEvent],
    profile: &'static AgencyProfile,
) -> Result<GeneratedFile, AppError> {
    let timeout = state.config.log_timeout;
    let file_name = log_file_name(staff);
    let started = Instant::now();

    let bytes = {
        let staff = staff.clone();
        let events = events.to_vec();
        let layout = state.layout.clone();
        run_blocking("training log", timeout, move || {
            render_training_log(&staff, &events, profile, &layout)
        })
        .await?
    };

    info!(
        "Training log rendered: {} ({} rows, {} bytes, {}ms)",
        file_name,
        events.len(),
        bytes.len(),
        started.elapsed().as_millis()
    );
    Ok(GeneratedFile::new(file_name, bytes))
}

/// Runs CPU-bound rendering on the blocking pool. Exceeding `timeout` maps to
/// `AppError::Timeout` for `stage`; the blocking task is left to finish on its own.
async fn run_blocking<T, F>(stage: &'static str, timeout: Duration, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(joined) => Ok(joined
            .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed rendering {stage}: {e}")))??),
        Err(_) => Err(AppError::Timeout {
            stage,
            secs: timeout.as_secs(),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
