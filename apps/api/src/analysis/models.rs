use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::call::models::{CallMetadata, CustomerHistoryRecord, SalespersonRecord};

// ────────────────────────────────────────────────────────────────────────────
// Model output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillScore {
    pub skill: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalespersonEvaluation {
    #[serde(deserialize_with = "lenient_score")]
    pub overall_score: u8, // 0-100
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub skill_scores: Vec<SkillScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerEvaluation {
    pub summary: String,
    pub customer_type: String,
    pub interest_level: String,
    pub needs: Vec<String>,
    pub pain_points: Vec<String>,
    pub objections: Vec<String>,
    pub buying_signals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationalEvaluation {
    pub summary: String,
    pub call_outcome: String,
    pub sentiment: String,
    pub key_moments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategicRecommendations {
    pub next_steps: Vec<String>,
    pub talking_points: Vec<String>,
    pub products_to_offer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_timing: Option<String>,
}

/// Accepts integers, fractions and numeric strings (`"85"`, `"85%"`), rounded and clamped
/// to 0-100. Anything else scores 0 instead of failing the whole result.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or_default())
}

/// Structured evaluation returned by the analysis model.
/// Sections the model leaves out fall back to empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub salesperson_evaluation: SalespersonEvaluation,
    pub customer_evaluation: CustomerEvaluation,
    pub situational_evaluation: SituationalEvaluation,
    pub strategic_recommendations: StrategicRecommendations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Text,
    Audio,
}

/// An uploaded recording. An empty `data` means no file was selected.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Text { transcript: String },
    Audio(Option<AudioUpload>),
}

impl AnalysisInput {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisInput::Text { .. } => AnalysisMode::Text,
            AnalysisInput::Audio(_) => AnalysisMode::Audio,
        }
    }
}

/// Reference data handed to the remote analysis alongside the call itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisContext<'a> {
    pub product_context: Option<&'a str>,
    pub customer_history: &'a [CustomerHistoryRecord],
    pub salesperson: Option<&'a SalespersonRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Stored output
// ────────────────────────────────────────────────────────────────────────────

/// Everything shown to the user after a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub mode: AnalysisMode,
    pub result: AnalysisResult,
    pub metadata: Option<CallMetadata>,
    pub matched_salesperson: Option<SalespersonRecord>,
    pub customer_history: Vec<CustomerHistoryRecord>,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_result_deserializes() {
        let json = r#"{
            "salespersonEvaluation": {
                "overallScore": 78,
                "summary": "Good rapport",
                "strengths": ["Clear product explanation"],
                "improvements": ["Ask for the close"],
                "skillScores": [{"skill": "Listening", "score": 80, "comment": "Patient"}]
            },
            "customerEvaluation": {
                "summary": "Price sensitive SME owner",
                "customerType": "Analytical",
                "interestLevel": "Medium",
                "needs": ["Lower monthly cost"],
                "painPoints": ["Current vendor slow"],
                "objections": ["Too expensive"],
                "buyingSignals": ["Asked about installation date"]
            },
            "situationalEvaluation": {
                "summary": "Follow-up call",
                "callOutcome": "Quote requested",
                "sentiment": "Positive",
                "keyMoments": ["Customer asked for a quote"]
            },
            "strategicRecommendations": {
                "nextSteps": ["Send quote today"],
                "talkingPoints": ["Total cost of ownership"],
                "productsToOffer": ["Annual plan"],
                "followUpTiming": "Within 2 days"
            },
            "transcribedText": "สวัสดีครับ"
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.salesperson_evaluation.overall_score, 78);
        assert_eq!(result.salesperson_evaluation.skill_scores[0].skill, "Listening");
        assert_eq!(result.customer_evaluation.objections, vec!["Too expensive"]);
        assert_eq!(result.situational_evaluation.call_outcome, "Quote requested");
        assert_eq!(
            result.strategic_recommendations.follow_up_timing.as_deref(),
            Some("Within 2 days")
        );
        assert_eq!(result.transcribed_text.as_deref(), Some("สวัสดีครับ"));
    }

    #[test]
    fn test_partial_result_uses_defaults() {
        let json = r#"{"salespersonEvaluation": {"summary": "Short call"}}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.salesperson_evaluation.summary, "Short call");
        assert_eq!(result.salesperson_evaluation.overall_score, 0);
        assert!(result.customer_evaluation.needs.is_empty());
        assert!(result.transcribed_text.is_none());
    }

    #[test]
    fn test_fractional_and_string_scores_are_tolerated() {
        let json = r#"{
            "salespersonEvaluation": {
                "overallScore": "82",
                "skillScores": [
                    {"skill": "Listening", "score": 7.5},
                    {"skill": "Closing", "score": "90%"},
                    {"skill": "Rapport", "score": 140},
                    {"skill": "Discovery", "score": "n/a"},
                    {"skill": "Follow-up", "score": null}
                ]
            }
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        let eval = &result.salesperson_evaluation;
        assert_eq!(eval.overall_score, 82);
        let scores: Vec<u8> = eval.skill_scores.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![8, 90, 100, 0, 0]);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(AnalysisResult::default()).unwrap();
        assert!(json.get("salespersonEvaluation").is_some());
        assert!(json.get("strategicRecommendations").is_some());
        assert!(json.get("transcribedText").is_none());
    }

    #[test]
    fn test_input_mode() {
        let text = AnalysisInput::Text {
            transcript: "hi".to_string(),
        };
        assert_eq!(text.mode(), AnalysisMode::Text);
        assert_eq!(AnalysisInput::Audio(None).mode(), AnalysisMode::Audio);
    }
}
