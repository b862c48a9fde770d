use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::orchestrator::AnalysisController;
use crate::auth::session::IdentitySession;
use crate::config::Config;
use crate::preferences::PreferenceStore;
use crate::sheets::client::SheetsGateway;
use crate::sheets::LoadedSheet;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Single-flight analysis controller; also holds the last outcome.
    pub analysis: Arc<AnalysisController>,
    /// Pluggable spreadsheet backend. Default: GoogleSheetsClient.
    pub sheets: Arc<dyn SheetsGateway>,
    /// Reference data from the most recently loaded sheet.
    pub data_context: Arc<RwLock<Option<Arc<LoadedSheet>>>>,
    pub identity: Arc<IdentitySession>,
    pub preferences: Arc<PreferenceStore>,
}
