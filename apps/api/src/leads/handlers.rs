use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::fetch::fetch_spreadsheet;
use crate::leads::filter::filter_priority;
use crate::leads::loader;
use crate::leads::report::{assemble_report, render_report};
use crate::models::lead::PriorityLead;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: String,
}

/// Stage 1 of the workflow: the priority-lead table, before any generation.
#[derive(Debug, Serialize)]
pub struct LeadPreviewResponse {
    pub total_records: usize,
    pub leads: Vec<PriorityLead>,
}

/// Stage 2: the full generated report. `failed` counts leads rendered with
/// the local fallback section.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub leads: Vec<PriorityLead>,
    pub sections: usize,
    pub failed: usize,
    pub report: String,
}

/// POST /api/v1/leads/upload
pub async fn handle_leads_upload(
    mut multipart: Multipart,
) -> Result<Json<LeadPreviewResponse>, AppError> {
    let bytes = read_upload(&mut multipart).await?;
    let (total_records, leads) = load_and_filter(&bytes)?;
    Ok(Json(LeadPreviewResponse {
        total_records,
        leads,
    }))
}

/// POST /api/v1/leads/fetch
pub async fn handle_leads_fetch(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<LeadPreviewResponse>, AppError> {
    let bytes = fetch_spreadsheet(&state.http, &req.url).await?;
    let (total_records, leads) = load_and_filter(&bytes)?;
    Ok(Json(LeadPreviewResponse {
        total_records,
        leads,
    }))
}

/// POST /api/v1/reports/upload
pub async fn handle_report_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReportResponse>, AppError> {
    let bytes = read_upload(&mut multipart).await?;
    run_report(&state, &bytes).await
}

/// POST /api/v1/reports/fetch
pub async fn handle_report_fetch(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let bytes = fetch_spreadsheet(&state.http, &req.url).await?;
    run_report(&state, &bytes).await
}

/// Loader → filter, shared by all four endpoints. `now` is resolved here,
/// at the boundary — never inside the filter.
fn load_and_filter(bytes: &[u8]) -> Result<(usize, Vec<PriorityLead>), AppError> {
    let records = loader::load(bytes)?;
    let leads = filter_priority(&records, Local::now().naive_local());
    info!(
        "Loaded {} records, {} priority leads",
        records.len(),
        leads.len()
    );
    Ok((records.len(), leads))
}

async fn run_report(state: &AppState, bytes: &[u8]) -> Result<Json<ReportResponse>, AppError> {
    let (_, leads) = load_and_filter(bytes)?;
    let sections = assemble_report(&leads, state.llm.as_ref()).await;
    let failed = sections.iter().filter(|s| !s.generated).count();
    let report = render_report(&sections);
    info!(
        "Report assembled: {} sections, {} fallbacks",
        sections.len(),
        failed
    );
    Ok(Json(ReportResponse {
        leads,
        sections: sections.len(),
        failed,
        report,
    }))
}

/// Picks the first multipart field carrying a filename. When no field has
/// one, falls back to the first non-empty field, so bare `curl -F data=@…`
/// style uploads still work.
async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    let mut fallback: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart upload: {e}")))?
    {
        let is_file = field.file_name().is_some();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart upload: {e}")))?;
        if bytes.is_empty() {
            continue;
        }
        if is_file {
            return Ok(bytes);
        }
        if fallback.is_none() {
            fallback = Some(bytes);
        }
    }
    fallback.ok_or_else(|| {
        AppError::Validation("Multipart upload contained no file".to_string())
    })
}
