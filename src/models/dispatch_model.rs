//! models/dispatch_model.rs
//! Request/response del envío masivo.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body de POST /api/email/send
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// Todos los correos salieron
    Sent,
    /// Algunos fallaron
    Partial,
    /// Fallaron todos los elegibles
    Failed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchFailure {
    pub identifier: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub dispatch_id: Uuid,
    pub status: DispatchStatus,
    pub eligible_count: usize,
    pub sent_count: usize,
    pub skipped_count: usize,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchOutcome {
    /// Arma el reporte final a partir de los fallos acumulados.
    pub fn from_failures(
        dispatch_id: Uuid,
        eligible_count: usize,
        skipped_count: usize,
        failures: Vec<DispatchFailure>,
    ) -> Self {
        let status = if failures.is_empty() {
            DispatchStatus::Sent
        } else if failures.len() < eligible_count {
            DispatchStatus::Partial
        } else {
            DispatchStatus::Failed
        };

        Self {
            dispatch_id,
            status,
            eligible_count,
            sent_count: eligible_count.saturating_sub(failures.len()),
            skipped_count,
            failures,
        }
    }
}
