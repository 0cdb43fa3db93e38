use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::CredentialRecord;
use crate::user::errors::AuthError;
use crate::user::ports::AuthenticationServicePort;
use crate::user::ports::UserStore;

/// Domain service for username/password authentication.
///
/// Concrete implementation of AuthenticationServicePort with dependency injection.
pub struct AuthenticationService<US>
where
    US: UserStore,
{
    store: Arc<US>,
    authenticator: Arc<Authenticator>,
    reject_disabled_at_login: bool,
}

impl<US> AuthenticationService<US>
where
    US: UserStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User directory
    /// * `authenticator` - Password verification and token issuance
    ///
    /// # Returns
    /// Service that lets disabled accounts log in (they are stopped at resource access)
    pub fn new(store: Arc<US>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
            reject_disabled_at_login: false,
        }
    }

    /// Refuse to issue tokens to disabled accounts.
    pub fn with_disabled_login_rejection(mut self, reject: bool) -> Self {
        self.reject_disabled_at_login = reject;
        self
    }
}

#[async_trait]
impl<US> AuthenticationServicePort for AuthenticationService<US>
where
    US: UserStore,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CredentialRecord, AuthError> {
        let record = self.store.get(username);

        // Unknown users still pay for one verification (against the decoy hash).
        let stored_hash = record.as_ref().map(|r| r.password_hash.clone());
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))?;

        match record {
            Some(record) if verified => Ok(record),
            _ => {
                tracing::info!(username = %username, "Authentication failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let record = self.authenticate(username, password).await?;

        if self.reject_disabled_at_login && record.disabled {
            tracing::warn!(username = %record.username, "Login refused for disabled account");
            return Err(AuthError::InactiveAccount);
        }

        let result = self.authenticator.generate_token(&record.username, None)?;

        tracing::info!(
            username = %record.username,
            expires_at = result.expires_at,
            "Access token issued"
        );

        Ok(AccessToken::bearer(result.access_token, result.expires_at))
    }
}
