//! Signed-in user session.
//!
//! Sign-in failures never surface as errors: they are logged and leave the session
//! signed out. A user closing the consent prompt is not a failure at all.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::auth::identity::{IdentityCapability, UserProfile};

/// Error codes the browser token client reports when the user backs out.
const CANCELLATION_CODES: &[&str] = &["popup_closed_by_user", "popup_closed", "access_denied"];

/// What the browser reports after running the Google token flow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignInOutcome {
    SignedIn { profile: UserProfile },
    Cancelled,
    SignedOut,
}

#[derive(Debug, Clone)]
struct Session {
    access_token: String,
    profile: UserProfile,
}

pub struct IdentitySession {
    capability: IdentityCapability,
    session: RwLock<Option<Session>>,
}

impl IdentitySession {
    pub fn new(capability: IdentityCapability) -> Self {
        Self {
            capability,
            session: RwLock::new(None),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.capability.provider().is_some()
    }

    pub fn client_id(&self) -> Option<String> {
        self.capability.provider().map(|p| p.client_id().to_string())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    pub async fn current_profile(&self) -> Option<UserProfile> {
        self.session.read().await.as_ref().map(|s| s.profile.clone())
    }

    pub async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Any outcome other than `SignedIn` or `Cancelled` drops an existing session.
    pub async fn sign_in(&self, request: SignInRequest) -> SignInOutcome {
        if let Some(code) = request.error.as_deref() {
            if CANCELLATION_CODES.contains(&code) {
                debug!("Sign-in prompt dismissed by user");
                return SignInOutcome::Cancelled;
            }
            warn!("Sign-in failed: {code}");
            return self.signed_out().await;
        }

        let Some(token) = request
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
        else {
            warn!("Sign-in request carried neither a token nor an error");
            return self.signed_out().await;
        };

        let Some(provider) = self.capability.provider() else {
            warn!("Sign-in attempted while Google identity is not ready");
            return self.signed_out().await;
        };

        match provider.fetch_profile(&token).await {
            Ok(profile) => {
                info!("Signed in as {}", profile.email);
                *self.session.write().await = Some(Session {
                    access_token: token,
                    profile: profile.clone(),
                });
                SignInOutcome::SignedIn { profile }
            }
            Err(e) => {
                warn!("Could not fetch Google profile: {e}");
                self.signed_out().await
            }
        }
    }

    async fn signed_out(&self) -> SignInOutcome {
        *self.session.write().await = None;
        SignInOutcome::SignedOut
    }

    pub async fn sign_out(&self) {
        if self.session.write().await.take().is_some() {
            info!("Signed out");
        }
    }
}
