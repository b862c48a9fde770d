//! Remote analysis seam.
//!
//! `CallAnalyzer` is the only thing the orchestrator knows about the AI service.
//! `GeminiCallAnalyzer` is the production backend; tests plug in fakes.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::models::{AnalysisContext, AnalysisResult, AudioUpload};
use crate::analysis::prompts::{
    ANALYSIS_SCHEMA, ANALYSIS_SYSTEM, AUDIO_ANALYSIS_PROMPT, HISTORY_HEADING, NO_REFERENCE,
    PRODUCT_HEADING, SALESPERSON_HEADING, TEXT_ANALYSIS_PROMPT, TRANSCRIPTION_FIELD,
};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM, LANGUAGE_INSTRUCTION};
use crate::llm_client::{Attachment, LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to prepare analysis request: {0}")]
    Prompt(#[from] serde_json::Error),
}

/// Remote analysis backend. `Ok(None)` means the service answered with nothing usable.
#[async_trait]
pub trait CallAnalyzer: Send + Sync {
    async fn analyze_text(
        &self,
        transcript: &str,
        context: AnalysisContext<'_>,
    ) -> Result<Option<AnalysisResult>, AnalyzerError>;

    async fn analyze_audio(
        &self,
        audio: &AudioUpload,
        context: AnalysisContext<'_>,
    ) -> Result<Option<AnalysisResult>, AnalyzerError>;
}

/// Gemini-backed analyzer. Audio is sent inline; the model transcribes and analyzes
/// in one call.
pub struct GeminiCallAnalyzer {
    llm: LlmClient,
    system: String,
}

impl GeminiCallAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!(
                "{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM} {GROUNDING_INSTRUCTION} {LANGUAGE_INSTRUCTION}"
            ),
        }
    }
}

#[async_trait]
impl CallAnalyzer for GeminiCallAnalyzer {
    async fn analyze_text(
        &self,
        transcript: &str,
        context: AnalysisContext<'_>,
    ) -> Result<Option<AnalysisResult>, AnalyzerError> {
        let prompt = build_text_prompt(transcript, &context)?;
        info!(
            "Analyzing text transcript ({} chars, {} history rows)",
            transcript.chars().count(),
            context.customer_history.len()
        );
        Ok(self.llm.call_json(&prompt, &self.system, None).await?)
    }

    async fn analyze_audio(
        &self,
        audio: &AudioUpload,
        context: AnalysisContext<'_>,
    ) -> Result<Option<AnalysisResult>, AnalyzerError> {
        let prompt = build_audio_prompt(&context)?;
        info!(
            "Analyzing audio '{}' ({} bytes, {})",
            audio.filename,
            audio.data.len(),
            audio.mime_type
        );
        let attachment = Attachment {
            mime_type: &audio.mime_type,
            data: &audio.data,
        };
        Ok(self
            .llm
            .call_json(&prompt, &self.system, Some(attachment))
            .await?)
    }
}

fn build_text_prompt(
    transcript: &str,
    context: &AnalysisContext<'_>,
) -> Result<String, serde_json::Error> {
    let schema = ANALYSIS_SCHEMA.replace("{transcription_field}", "");
    Ok(TEXT_ANALYSIS_PROMPT
        .replace("{schema}", &schema)
        .replace("{reference}", &render_reference(context)?)
        .replace("{transcript}", transcript.trim()))
}

fn build_audio_prompt(context: &AnalysisContext<'_>) -> Result<String, serde_json::Error> {
    let schema = ANALYSIS_SCHEMA.replace("{transcription_field}", TRANSCRIPTION_FIELD);
    Ok(AUDIO_ANALYSIS_PROMPT
        .replace("{schema}", &schema)
        .replace("{reference}", &render_reference(context)?))
}

/// Renders the optional reference sections. Absent data leaves its section out.
fn render_reference(context: &AnalysisContext<'_>) -> Result<String, serde_json::Error> {
    let mut sections = Vec::new();

    if let Some(product) = context.product_context.map(str::trim).filter(|p| !p.is_empty()) {
        sections.push(format!("{PRODUCT_HEADING}\n{product}"));
    }

    if let Some(sp) = context.salesperson {
        sections.push(format!("{SALESPERSON_HEADING}\n{} ({})", sp.name, sp.phone));
    }

    if !context.customer_history.is_empty() {
        let history = serde_json::to_string_pretty(context.customer_history)?;
        sections.push(format!("{HISTORY_HEADING}\n{history}"));
    }

    if sections.is_empty() {
        debug!("No reference data for this call");
        return Ok(NO_REFERENCE.to_string());
    }

    Ok(sections.join("\n\n"))
}
