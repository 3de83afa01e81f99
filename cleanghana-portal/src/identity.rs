//! Identity bootstrap
//!
//! The portal resolves one identity at startup and stamps it on every
//! record it creates as `reporterId`. The provider is an opaque external
//! capability: anonymous sign-in unless the deployment supplies a custom
//! token.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

/// Opaque identity string produced by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External identity capability
pub trait IdentityProvider: Send + Sync {
    /// Create a fresh anonymous identity
    fn sign_in_anonymously(&self) -> Result<Identity, PortalError>;

    /// Exchange a pre-supplied token for its identity
    fn sign_in_with_custom_token(&self, token: &str) -> Result<Identity, PortalError>;
}

/// Local stand-in for the hosted anonymous-auth provider
pub struct AnonymousIdentityProvider;

impl AnonymousIdentityProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnonymousIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AnonymousIdentityProvider {
    fn sign_in_anonymously(&self) -> Result<Identity, PortalError> {
        Ok(Identity(format!("anon-{}", Uuid::new_v4())))
    }

    fn sign_in_with_custom_token(&self, token: &str) -> Result<Identity, PortalError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(PortalError::Validation("auth token is empty".to_string()));
        }
        // The stand-in derives a stable identity from the token rather
        // than verifying it; verification belongs to the real provider.
        Ok(Identity(format!("token-{token}")))
    }
}

/// Resolve the startup identity: custom token when supplied, anonymous
/// otherwise
pub fn bootstrap_identity(
    provider: &impl IdentityProvider,
    auth_token: Option<&str>,
) -> Result<Identity, PortalError> {
    match auth_token {
        Some(token) => provider.sign_in_with_custom_token(token),
        None => provider.sign_in_anonymously(),
    }
}
