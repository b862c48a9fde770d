//! Axum route handlers for the Sheets API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::call::models::SalespersonRecord;
use crate::errors::AppError;
use crate::sheets::client::SheetsError;
use crate::sheets::parse::{extract_spreadsheet_id, result_row};
use crate::sheets::LoadedSheet;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoadSheetRequest {
    /// Spreadsheet id or URL. Falls back to the remembered id when absent.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContextSummary {
    pub spreadsheet_id: String,
    pub has_product_context: bool,
    pub salespersons: Vec<SalespersonRecord>,
    pub customer_history_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&LoadedSheet> for ContextSummary {
    fn from(sheet: &LoadedSheet) -> Self {
        ContextSummary {
            spreadsheet_id: sheet.spreadsheet_id.clone(),
            has_product_context: sheet.context.product_context.is_some(),
            salespersons: sheet.context.salespersons.clone(),
            customer_history_count: sheet.context.customer_history.len(),
            loaded_at: sheet.loaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveResultResponse {
    pub spreadsheet_id: String,
    pub run_id: Uuid,
}

/// POST /api/v1/sheets/load
pub async fn handle_load_sheet(
    State(state): State<AppState>,
    payload: Result<Json<LoadSheetRequest>, JsonRejection>,
) -> Result<Json<ContextSummary>, AppError> {
    let Json(request) = payload?;
    let spreadsheet_id = match request.spreadsheet_id.filter(|s| !s.trim().is_empty()) {
        Some(raw) => extract_spreadsheet_id(&raw).ok_or_else(|| {
            AppError::Validation(format!("'{raw}' is not a spreadsheet id or URL"))
        })?,
        None => state.preferences.spreadsheet_id().await.ok_or_else(|| {
            AppError::Validation("Please enter a spreadsheet id or URL".to_string())
        })?,
    };

    let token = state.identity.access_token().await;
    let context = state
        .sheets
        .load_data_context(&spreadsheet_id, token.as_deref())
        .await
        .map_err(|e| match e {
            e @ SheetsError::MissingCredentials => AppError::ConfigurationMissing(e.to_string()),
            other => AppError::Sheets(other.to_string()),
        })?;

    if let Err(e) = state.preferences.set_spreadsheet_id(&spreadsheet_id).await {
        warn!("Could not remember spreadsheet id: {e:#}");
    }

    let loaded = Arc::new(LoadedSheet {
        spreadsheet_id,
        context,
        loaded_at: Utc::now(),
    });
    let summary = ContextSummary::from(loaded.as_ref());
    *state.data_context.write().await = Some(loaded);

    Ok(Json(summary))
}

/// GET /api/v1/sheets/context
pub async fn handle_get_context(
    State(state): State<AppState>,
) -> Result<Json<ContextSummary>, AppError> {
    let loaded = state.data_context.read().await.clone();
    loaded
        .as_deref()
        .map(|sheet| Json(ContextSummary::from(sheet)))
        .ok_or_else(|| AppError::NotFound("No spreadsheet has been loaded".to_string()))
}

/// POST /api/v1/sheets/results
///
/// Appends the latest successful analysis to the loaded spreadsheet.
pub async fn handle_save_result(
    State(state): State<AppState>,
) -> Result<Json<SaveResultResponse>, AppError> {
    let token = state
        .identity
        .access_token()
        .await
        .ok_or(AppError::Unauthorized)?;

    let report = state
        .analysis
        .last_report()
        .await
        .ok_or_else(|| AppError::NotFound("There is no analysis result to save".to_string()))?;

    let spreadsheet_id = state
        .data_context
        .read()
        .await
        .as_ref()
        .map(|sheet| sheet.spreadsheet_id.clone())
        .ok_or_else(|| AppError::Validation("Load a spreadsheet before saving".to_string()))?;

    state
        .sheets
        .append_result(&spreadsheet_id, &token, result_row(&report))
        .await
        .map_err(|e| AppError::Sheets(e.to_string()))?;

    Ok(Json(SaveResultResponse {
        spreadsheet_id,
        run_id: report.run_id,
    }))
}
