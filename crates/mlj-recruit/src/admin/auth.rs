use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in identity as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Profile document looked up by identity. A missing profile means
/// non-admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("メールアドレスまたはパスワードが正しくありません")]
    InvalidCredentials,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Port onto the identity/auth collaborator.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
    fn sign_out(&self);
    fn current_identity(&self) -> Result<Option<Identity>, AuthError>;
    fn profile(&self, uid: &str) -> Result<Option<UserProfile>, AuthError>;
}

/// Where to send a caller the gate refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted(Identity),
    /// No identity, or the lookup itself failed: re-authenticate.
    RedirectToLogin,
    /// Signed in but not an administrator: back to the public site.
    RedirectToPublic,
}

/// Verifies that the ambient identity carries the administrative role.
///
/// Fail-CLOSED: any provider error denies access and redirects to login.
/// This is intentionally the inverse of the duplicate-submission probe,
/// which fails open.
pub struct AuthGate<P> {
    provider: Arc<P>,
}

impl<P: IdentityProvider> AuthGate<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn authorize(&self) -> AccessDecision {
        let identity = match self.provider.current_identity() {
            Ok(Some(identity)) => identity,
            Ok(None) => return AccessDecision::RedirectToLogin,
            Err(_) => return AccessDecision::RedirectToLogin,
        };

        match self.is_admin(&identity.uid) {
            Ok(true) => AccessDecision::Granted(identity),
            Ok(false) => AccessDecision::RedirectToPublic,
            Err(_) => AccessDecision::RedirectToLogin,
        }
    }

    pub fn is_admin(&self, uid: &str) -> Result<bool, AuthError> {
        let profile = self.provider.profile(uid)?;
        Ok(matches!(
            profile,
            Some(UserProfile {
                role: Role::Admin,
                ..
            })
        ))
    }
}
