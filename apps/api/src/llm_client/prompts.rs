// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps the model inside the evidence it was given.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the call content and the reference data provided. \
    Do NOT invent customer details, prices, or commitments that were not mentioned. \
    If the call does not support a judgement, say so briefly instead of guessing.";

/// Instruction that fixes the output language to the language of the call.
pub const LANGUAGE_INSTRUCTION: &str = "\
    Write every free-text value in the same language the conversation is held in \
    (Thai calls get Thai feedback). Keep JSON keys exactly as specified in English.";
