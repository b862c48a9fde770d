//! Analysis Orchestrator: runs one analysis at a time and keeps its outcome.
//!
//! Flow: credential check → filename parse (audio) → phone matching →
//!       input validation → remote analysis → stored report.
//!
//! Phases: Idle → Running → {Succeeded, Failed}. A new submission starts from any
//! settled phase; a submission while Running is rejected without touching state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::CallAnalyzer;
use crate::analysis::models::{AnalysisContext, AnalysisInput, AnalysisReport};
use crate::call::filename::parse_call_filename;
use crate::call::models::DataContext;
use crate::call::phone::{match_call, CallMatch};
use crate::errors::AppError;

pub const MISSING_API_KEY_MESSAGE: &str =
    "The analysis service is not configured. Set GEMINI_API_KEY and restart the server.";
pub const EMPTY_TRANSCRIPT_MESSAGE: &str = "Please enter a call transcript to analyze.";
pub const MISSING_AUDIO_MESSAGE: &str = "Please select an audio file to analyze.";

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Running {
        run_id: Uuid,
        started_at: DateTime<Utc>,
    },
    Succeeded(Arc<AnalysisReport>),
    Failed {
        message: String,
    },
}

/// Point-in-time view of the orchestrator, returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AnalysisSnapshot {
    Idle,
    Running {
        run_id: Uuid,
        started_at: DateTime<Utc>,
    },
    Succeeded {
        report: Arc<AnalysisReport>,
    },
    Failed {
        message: String,
    },
}

/// Owns the single in-flight analysis and the last outcome.
///
/// `analyzer` is `None` when no API credential was configured.
pub struct AnalysisController {
    analyzer: Option<Arc<dyn CallAnalyzer>>,
    phase: Mutex<Phase>,
}

impl AnalysisController {
    pub fn new(analyzer: Option<Arc<dyn CallAnalyzer>>) -> Self {
        Self {
            analyzer,
            phase: Mutex::new(Phase::Idle),
        }
    }

    pub async fn snapshot(&self) -> AnalysisSnapshot {
        match &*self.phase.lock().await {
            Phase::Idle => AnalysisSnapshot::Idle,
            Phase::Running { run_id, started_at } => AnalysisSnapshot::Running {
                run_id: *run_id,
                started_at: *started_at,
            },
            Phase::Succeeded(report) => AnalysisSnapshot::Succeeded {
                report: Arc::clone(report),
            },
            Phase::Failed { message } => AnalysisSnapshot::Failed {
                message: message.clone(),
            },
        }
    }

    /// The most recent successful report, if the last run succeeded.
    pub async fn last_report(&self) -> Option<Arc<AnalysisReport>> {
        match &*self.phase.lock().await {
            Phase::Succeeded(report) => Some(Arc::clone(report)),
            _ => None,
        }
    }

    /// Runs one analysis end to end and records the outcome.
    ///
    /// Returns `AppError::Busy` without changing state if another run is in flight.
    pub async fn run_analysis(
        &self,
        input: AnalysisInput,
        data_context: Option<&DataContext>,
    ) -> Result<Arc<AnalysisReport>, AppError> {
        let run_id = Uuid::new_v4();
        {
            let mut phase = self.phase.lock().await;
            if matches!(*phase, Phase::Running { .. }) {
                return Err(AppError::Busy);
            }
            *phase = Phase::Running {
                run_id,
                started_at: Utc::now(),
            };
        }

        let outcome = self.execute(run_id, input, data_context).await;

        let mut phase = self.phase.lock().await;
        match &outcome {
            Ok(report) => {
                info!("Analysis {run_id} succeeded");
                *phase = Phase::Succeeded(Arc::clone(report));
            }
            Err(e) => {
                warn!("Analysis {run_id} failed: {e}");
                *phase = Phase::Failed {
                    message: e.user_message(),
                };
            }
        }
        outcome
    }

    async fn execute(
        &self,
        run_id: Uuid,
        input: AnalysisInput,
        data_context: Option<&DataContext>,
    ) -> Result<Arc<AnalysisReport>, AppError> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| AppError::ConfigurationMissing(MISSING_API_KEY_MESSAGE.to_string()))?;

        let mode = input.mode();

        let metadata = match &input {
            AnalysisInput::Audio(Some(audio)) => parse_call_filename(&audio.filename),
            _ => None,
        };
        if matches!(input, AnalysisInput::Audio(Some(_))) && metadata.is_none() {
            info!("Recording filename has no call metadata; continuing without it");
        }

        let call_match = match (&metadata, data_context) {
            (Some(meta), Some(ctx)) => match_call(meta, ctx),
            _ => CallMatch::default(),
        };

        let context = AnalysisContext {
            product_context: data_context.and_then(|c| c.product_context.as_deref()),
            customer_history: &call_match.customer_history,
            salesperson: call_match.salesperson.as_ref(),
        };

        let remote = match &input {
            AnalysisInput::Text { transcript } => {
                if transcript.trim().is_empty() {
                    return Err(AppError::Validation(EMPTY_TRANSCRIPT_MESSAGE.to_string()));
                }
                analyzer.analyze_text(transcript, context).await
            }
            AnalysisInput::Audio(audio) => {
                let audio = audio
                    .as_ref()
                    .filter(|a| !a.data.is_empty())
                    .ok_or_else(|| AppError::Validation(MISSING_AUDIO_MESSAGE.to_string()))?;
                analyzer.analyze_audio(audio, context).await
            }
        };

        let result = remote.map_err(AppError::remote)?.ok_or(AppError::EmptyResult)?;

        Ok(Arc::new(AnalysisReport {
            run_id,
            mode,
            result,
            metadata,
            matched_salesperson: call_match.salesperson,
            customer_history: call_match.customer_history,
            analyzed_at: Utc::now(),
        }))
    }
}
