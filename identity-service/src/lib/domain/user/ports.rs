use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::PublicIdentity;
use crate::user::errors::AuthError;

/// Port for username/password authentication.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Check a username/password pair against the user directory.
    ///
    /// # Arguments
    /// * `username` - Username as submitted
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// The full credential record, disabled flag included
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `Internal` - Verification task failed
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialRecord, AuthError>;

    /// Authenticate and issue an access token.
    ///
    /// # Arguments
    /// * `username` - Username as submitted
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// Bearer access token with the default lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `InactiveAccount` - Account disabled and login-time rejection is enabled
    /// * `Internal` - Token signing failed
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError>;
}

/// Port for bearer token validation.
pub trait SessionValidatorPort: Send + Sync + 'static {
    /// Decode a token and resolve its subject.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, tampered, or subject unknown
    fn resolve(&self, token: &str) -> Result<PublicIdentity, AuthError>;

    /// Reject disabled accounts.
    ///
    /// # Errors
    /// * `InactiveAccount` - Identity is disabled
    fn ensure_active(&self, identity: PublicIdentity) -> Result<PublicIdentity, AuthError>;

    /// Resolve and activity-check in one step.
    ///
    /// # Errors
    /// * `Unauthorized` - See `resolve`
    /// * `InactiveAccount` - See `ensure_active`
    fn authorize(&self, token: &str) -> Result<AuthenticatedSession, AuthError>;
}

/// Read-only user directory.
pub trait UserStore: Send + Sync + 'static {
    /// Look up a credential record by username.
    ///
    /// # Returns
    /// The record, or `None` if no such user exists
    fn get(&self, username: &str) -> Option<CredentialRecord>;
}
