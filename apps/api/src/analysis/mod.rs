// Call analysis: remote analyzer seam, single-flight orchestrator and HTTP handlers.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
