use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and which integrations are usable.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "call-insight-api",
        "analysis_configured": state.config.gemini_api_key.is_some(),
        "identity_ready": state.identity.is_ready()
    }))
}
