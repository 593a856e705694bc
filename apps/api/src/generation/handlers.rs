//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::batch::{generate_batch, BatchRequest, BatchResponse};
use crate::generation::generator::{generate_documents, GenerateRequest, GenerateResponse};
use crate::models::Agency;
use crate::schedule::build_schedule;
use crate::schedule::manifest::{to_rows, ScheduleRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreviewResponse {
    pub staff_name: String,
    pub agency: Agency,
    pub event_count: usize,
    pub events: Vec<ScheduleRow>,
}

/// Malformed JSON gets the same `{ error }` body as every other client error.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// POST /generate
///
/// Builds the schedule, renders the training log, certificates and pre/post
/// tests, and returns every file base64-encoded.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = json_body(body)?.validate()?;
    let span = info_span!("generate", request_id = %Uuid::new_v4(), staff = %request.staff.safe_name);
    let response = generate_documents(&state, &request).instrument(span).await?;
    Ok(Json(response))
}

/// POST /generate/batch
///
/// Generates bundles for several staff members. Always 200 once the body
/// parses; per-member failures are reported in `results`.
pub async fn handle_generate_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, AppError> {
    let batch = json_body(body)?;
    let span = info_span!("generate_batch", request_id = %Uuid::new_v4(), members = batch.staff.len());
    Ok(Json(generate_batch(&state, &batch).instrument(span).await))
}

/// POST /schedule
///
/// Returns the computed schedule without rendering any documents.
/// Useful for checking dates before generating.
pub async fn handle_schedule_preview(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<SchedulePreviewResponse>, AppError> {
    let request = json_body(body)?.validate()?;
    let events = build_schedule(
        request.hire_date,
        request.separation_date,
        state.clock.today(),
    );
    Ok(Json(SchedulePreviewResponse {
        staff_name: request.staff.display_name,
        agency: request.agency,
        event_count: events.len(),
        events: to_rows(&events),
    }))
}
