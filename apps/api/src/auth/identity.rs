//! Google identity provider.
//!
//! Initialization is an explicit async step: it resolves the userinfo endpoint from
//! Google's OpenID discovery document and yields a capability that is either ready
//! to fetch profiles or records why it is not.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

const DISCOVERY_URL: &str = "https://accounts.google.com/.well-known/openid-configuration";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity provider rejected the token (status {0})")]
    Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// OAuth client id the browser uses to request tokens.
    fn client_id(&self) -> &str;

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, IdentityError>;
}

/// Result of identity initialization, injected into the session store.
#[derive(Clone)]
pub enum IdentityCapability {
    Ready(Arc<dyn ProfileProvider>),
    NotReady { reason: String },
}

impl IdentityCapability {
    pub async fn initialize(config: &Config) -> Self {
        let Some(client_id) = config.google_client_id.clone() else {
            let reason = "GOOGLE_CLIENT_ID is not set".to_string();
            info!("Google sign-in disabled: {reason}");
            return IdentityCapability::NotReady { reason };
        };

        match GoogleProfileProvider::discover(client_id).await {
            Ok(provider) => {
                info!("Google sign-in ready");
                IdentityCapability::Ready(Arc::new(provider))
            }
            Err(e) => {
                warn!("Google sign-in unavailable: {e}");
                IdentityCapability::NotReady {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn provider(&self) -> Option<&Arc<dyn ProfileProvider>> {
        match self {
            IdentityCapability::Ready(provider) => Some(provider),
            IdentityCapability::NotReady { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    userinfo_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<GoogleUserInfo> for UserProfile {
    fn from(info: GoogleUserInfo) -> Self {
        let email = info.email.unwrap_or_default();
        UserProfile {
            // Accounts without a display name fall back to their address
            name: info
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| email.clone()),
            email,
            image_url: info.picture,
        }
    }
}

pub struct GoogleProfileProvider {
    client: Client,
    client_id: String,
    userinfo_endpoint: String,
}

impl GoogleProfileProvider {
    pub async fn discover(client_id: String) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        let doc: DiscoveryDocument = client
            .get(DISCOVERY_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Self {
            client,
            client_id,
            userinfo_endpoint: doc.userinfo_endpoint,
        })
    }
}

#[async_trait]
impl ProfileProvider for GoogleProfileProvider {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .client
            .get(&self.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        let info: GoogleUserInfo = response.json().await?;
        Ok(info.into())
    }
}
