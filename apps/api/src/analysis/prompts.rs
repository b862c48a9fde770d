// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for call analysis. Cross-cutting fragments are appended at call time.
pub const ANALYSIS_SYSTEM: &str = "You are a senior sales coach who reviews recorded \
    sales calls. You evaluate the salesperson, profile the customer, read the situation \
    and recommend the next move.";

/// Output schema shared by text and audio analysis.
pub const ANALYSIS_SCHEMA: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "salespersonEvaluation": {
    "overallScore": 0,
    "summary": "string",
    "strengths": ["string"],
    "improvements": ["string"],
    "skillScores": [{"skill": "string", "score": 0, "comment": "string"}]
  },
  "customerEvaluation": {
    "summary": "string",
    "customerType": "string",
    "interestLevel": "High" | "Medium" | "Low",
    "needs": ["string"],
    "painPoints": ["string"],
    "objections": ["string"],
    "buyingSignals": ["string"]
  },
  "situationalEvaluation": {
    "summary": "string",
    "callOutcome": "string",
    "sentiment": "Positive" | "Neutral" | "Negative",
    "keyMoments": ["string"]
  },
  "strategicRecommendations": {
    "nextSteps": ["string"],
    "talkingPoints": ["string"],
    "productsToOffer": ["string"],
    "followUpTiming": "string" | null
  }{transcription_field}
}

Scores are integers from 0 to 100. Score skills such as rapport building, needs discovery,
product knowledge, objection handling and closing."#;

/// Text analysis prompt. Replace `{schema}`, `{reference}` and `{transcript}` before sending.
pub const TEXT_ANALYSIS_PROMPT: &str = r#"Analyze the following sales call transcript.

{reference}

TRANSCRIPT:
{transcript}

{schema}"#;

/// Audio analysis prompt. Replace `{schema}` and `{reference}` before sending.
/// The recording itself travels as inline data next to this prompt.
pub const AUDIO_ANALYSIS_PROMPT: &str = r#"The attached audio file is a recorded sales call.
First transcribe it verbatim, labelling speakers as "Salesperson:" and "Customer:".
Then analyze the call.

{reference}

{schema}"#;

/// Extra schema field requested from audio analysis.
pub const TRANSCRIPTION_FIELD: &str = r#",
  "transcribedText": "string""#;

/// Section headings for reference data. Omitted entirely when the data is absent.
pub const PRODUCT_HEADING: &str = "PRODUCT INFORMATION:";
pub const SALESPERSON_HEADING: &str = "SALESPERSON ON THIS CALL:";
pub const HISTORY_HEADING: &str = "PREVIOUS INTERACTIONS WITH THIS CUSTOMER (JSON):";
pub const NO_REFERENCE: &str = "No additional reference data is available for this call.";
