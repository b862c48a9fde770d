//! Axum route handlers for the Analysis API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::analysis::models::{AnalysisInput, AnalysisReport, AudioUpload};
use crate::analysis::orchestrator::AnalysisSnapshot;
use crate::errors::AppError;
use crate::state::AppState;

/// Largest accepted recording upload.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    #[serde(default)]
    pub transcript: String,
}

/// POST /api/v1/analysis/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<TextAnalysisRequest>, JsonRejection>,
) -> Result<Json<Arc<AnalysisReport>>, AppError> {
    let Json(request) = payload?;
    let input = AnalysisInput::Text {
        transcript: request.transcript,
    };
    run(&state, input).await.map(Json)
}

/// POST /api/v1/analysis/audio
///
/// Multipart form with the recording in a `file` field. A request without that field
/// still reaches the orchestrator, which reports the missing file.
pub async fn handle_analyze_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Arc<AnalysisReport>>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let declared = field.content_type().map(str::to_string);
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;

        upload = Some(AudioUpload {
            mime_type: audio_mime_type(&filename, declared.as_deref()),
            filename,
            data,
        });
    }

    run(&state, AnalysisInput::Audio(upload)).await.map(Json)
}

/// GET /api/v1/analysis
pub async fn handle_get_analysis(State(state): State<AppState>) -> Json<AnalysisSnapshot> {
    Json(state.analysis.snapshot().await)
}

/// Runs the analysis on its own task so a dropped connection cannot leave the
/// orchestrator stuck in `Running`.
async fn run(state: &AppState, input: AnalysisInput) -> Result<Arc<AnalysisReport>, AppError> {
    let controller = Arc::clone(&state.analysis);
    let loaded = state.data_context.read().await.clone();

    tokio::spawn(async move {
        let data_context = loaded.as_deref().map(|sheet| &sheet.context);
        controller.run_analysis(input, data_context).await
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?
}

/// Picks the MIME type sent to the model. A declared `audio/*` type wins; otherwise
/// the extension decides, defaulting to MP3.
fn audio_mime_type(filename: &str, declared: Option<&str>) -> String {
    if let Some(declared) = declared.filter(|d| d.starts_with("audio/")) {
        return declared.to_string();
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        _ => "audio/mpeg",
    }
    .to_string()
}
