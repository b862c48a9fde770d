mod analysis;
mod auth;
mod call;
mod config;
mod errors;
mod llm_client;
mod preferences;
mod routes;
mod sheets;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::analyzer::{CallAnalyzer, GeminiCallAnalyzer};
use crate::analysis::orchestrator::AnalysisController;
use crate::auth::identity::IdentityCapability;
use crate::auth::session::IdentitySession;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::preferences::PreferenceStore;
use crate::routes::build_router;
use crate::sheets::client::GoogleSheetsClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Call Insight API v{}", env!("CARGO_PKG_VERSION"));

    // Analysis stays unavailable (503) until GEMINI_API_KEY is set
    let analyzer: Option<Arc<dyn CallAnalyzer>> = match config.gemini_api_key.clone() {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(GeminiCallAnalyzer::new(LlmClient::new(key))))
        }
        None => {
            warn!("GEMINI_API_KEY is not set; analysis requests will be refused");
            None
        }
    };

    let sheets = Arc::new(GoogleSheetsClient::new(config.google_api_key.clone()));

    let capability = IdentityCapability::initialize(&config).await;

    let preferences = PreferenceStore::open(&config.preferences_path).await;

    let state = AppState {
        config: config.clone(),
        analysis: Arc::new(AnalysisController::new(analyzer)),
        sheets,
        data_context: Arc::new(RwLock::new(None)),
        identity: Arc::new(IdentitySession::new(capability)),
        preferences: Arc::new(preferences),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
