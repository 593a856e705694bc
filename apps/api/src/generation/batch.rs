//! Batch generation — many staff members in one call.
//!
//! Members are processed one at a time. A failing member is reported in its
//! result slot and never stops the rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::generation::generator::{generate_documents, GenerateRequest};
use crate::generation::workspace::EncodedFile;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub staff: Vec<GenerateRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub staff_name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<EncodedFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
}

pub async fn generate_batch(state: &AppState, batch: &BatchRequest) -> BatchResponse {
    let mut results = Vec::with_capacity(batch.staff.len());

    for member in &batch.staff {
        let staff_name = member.name.clone().unwrap_or_default();
        let outcome = match member.validate() {
            Ok(valid) => generate_documents(state, &valid).await,
            Err(e) => Err(e),
        };

        results.push(match outcome {
            Ok(response) => BatchItemResult {
                staff_name: response.staff_name,
                ok: true,
                file_count: Some(response.file_count),
                files: Some(response.files),
                error: None,
            },
            Err(e) => {
                warn!("Batch member '{staff_name}' failed: {e}");
                BatchItemResult {
                    staff_name,
                    ok: false,
                    file_count: None,
                    files: None,
                    error: Some(e.to_string()),
                }
            }
        });
    }

    let succeeded = results.iter().filter(|r| r.ok).count();
    let failed = results.len() - succeeded;
    info!("Batch done: {succeeded} succeeded, {failed} failed out of {}", results.len());

    BatchResponse {
        succeeded,
        failed,
        results,
    }
}
