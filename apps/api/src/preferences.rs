use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Values remembered between server restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub spreadsheet_id: Option<String>,
}

/// JSON-file backed key-value store for `Preferences`.
pub struct PreferenceStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PreferenceStore {
    /// Opens the store. A missing or unreadable file starts with empty preferences.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable preferences at {}: {e}", path.display());
                Preferences::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                warn!("Could not read preferences at {}: {e}", path.display());
                Preferences::default()
            }
        };
        info!("Preferences loaded from {}", path.display());

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub async fn spreadsheet_id(&self) -> Option<String> {
        self.current.read().await.spreadsheet_id.clone()
    }

    pub async fn set_spreadsheet_id(&self, spreadsheet_id: &str) -> Result<()> {
        let mut current = self.current.write().await;
        if current.spreadsheet_id.as_deref() == Some(spreadsheet_id) {
            return Ok(());
        }
        current.spreadsheet_id = Some(spreadsheet_id.to_string());
        self.persist(&current).await
    }

    async fn persist(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(prefs)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
