use std::sync::Arc;

use auth::Authenticator;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::PublicIdentity;
use crate::domain::user::models::SessionStage;
use crate::user::errors::AuthError;
use crate::user::ports::SessionValidatorPort;
use crate::user::ports::UserStore;

/// Validates bearer tokens presented on protected routes.
///
/// A token goes `TokenPresented -> Decoded -> UserResolved -> ActiveChecked`
/// and is granted only if it clears every stage.
pub struct SessionValidator<US>
where
    US: UserStore,
{
    store: Arc<US>,
    authenticator: Arc<Authenticator>,
}

impl<US> SessionValidator<US>
where
    US: UserStore,
{
    pub fn new(store: Arc<US>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

impl<US> SessionValidatorPort for SessionValidator<US>
where
    US: UserStore,
{
    fn resolve(&self, token: &str) -> Result<PublicIdentity, AuthError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(
                stage = %SessionStage::TokenPresented,
                error = %e,
                "Token rejected"
            );
            AuthError::from(e)
        })?;

        let record = self.store.get(&claims.sub).ok_or_else(|| {
            tracing::warn!(
                stage = %SessionStage::Decoded,
                subject = %claims.sub,
                "Token subject does not exist"
            );
            AuthError::Unauthorized
        })?;

        Ok(record.identity())
    }

    fn ensure_active(&self, identity: PublicIdentity) -> Result<PublicIdentity, AuthError> {
        if identity.disabled {
            tracing::warn!(
                stage = %SessionStage::UserResolved,
                username = %identity.username,
                "Inactive account presented a valid token"
            );
            return Err(AuthError::InactiveAccount);
        }

        Ok(identity)
    }

    fn authorize(&self, token: &str) -> Result<AuthenticatedSession, AuthError> {
        let identity = self.resolve(token)?;
        let identity = self.ensure_active(identity)?;

        tracing::debug!(
            stage = %SessionStage::ActiveChecked,
            username = %identity.username,
            "Session granted"
        );

        Ok(AuthenticatedSession { identity })
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use auth::PasswordHasher;
    use auth::TokenCodec;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::CredentialRecord;
    use crate::domain::user::models::EmailAddress;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mock! {
        pub TestUserStore {}

        impl UserStore for TestUserStore {
            fn get(&self, username: &str) -> Option<CredentialRecord>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(
            PasswordHasher::new("test-pepper"),
            TokenCodec::new(SECRET),
        ))
    }

    fn record(disabled: bool) -> CredentialRecord {
        CredentialRecord {
            username: "johndoe".to_string(),
            full_name: Some("John Doe".to_string()),
            email: Some(EmailAddress::new("johndoe@example.com".to_string()).unwrap()),
            password_hash: "$argon2id$unused".to_string(),
            disabled,
        }
    }

    fn validator(
        stored: Option<CredentialRecord>,
        lookups: usize,
    ) -> SessionValidator<MockTestUserStore> {
        let mut store = MockTestUserStore::new();
        store
            .expect_get()
            .withf(|username| username == "johndoe")
            .times(lookups)
            .returning(move |_| stored.clone());

        SessionValidator::new(Arc::new(store), authenticator())
    }

    fn token_for(subject: &str) -> String {
        TokenCodec::new(SECRET).issue(subject, None).unwrap().token
    }

    #[test]
    fn test_resolve_valid_token() {
        let validator = validator(Some(record(false)), 1);

        let identity = validator.resolve(&token_for("johndoe")).unwrap();

        assert_eq!(identity, record(false).identity());
    }

    #[test]
    fn test_resolve_garbage_token() {
        let validator = validator(None, 0);

        assert_eq!(validator.resolve("garbage"), Err(AuthError::Unauthorized));
        assert_eq!(validator.resolve(""), Err(AuthError::Unauthorized));
    }

    #[test]
    fn test_resolve_expired_token() {
        let validator = validator(Some(record(false)), 0);
        let claims = Claims::for_subject("johndoe", Duration::minutes(30))
            .with_expiration(Utc::now().timestamp() - 1);
        let token = TokenCodec::new(SECRET).encode(&claims).unwrap();

        assert_eq!(validator.resolve(&token), Err(AuthError::Unauthorized));
    }

    #[test]
    fn test_resolve_token_signed_with_other_key() {
        let validator = validator(Some(record(false)), 0);
        let token = TokenCodec::new(b"another-secret-key-at-least-32-bytes!!")
            .issue("johndoe", None)
            .unwrap()
            .token;

        assert_eq!(validator.resolve(&token), Err(AuthError::Unauthorized));
    }

    #[test]
    fn test_resolve_unknown_subject() {
        let validator = validator(None, 1);

        assert_eq!(
            validator.resolve(&token_for("johndoe")),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn test_resolve_disabled_user_then_ensure_active() {
        let validator = validator(Some(record(true)), 1);

        let identity = validator.resolve(&token_for("johndoe")).unwrap();
        assert!(identity.disabled);

        assert_eq!(
            validator.ensure_active(identity),
            Err(AuthError::InactiveAccount)
        );
    }

    #[test]
    fn test_authorize_active_user() {
        let validator = validator(Some(record(false)), 1);

        let session = validator.authorize(&token_for("johndoe")).unwrap();

        assert_eq!(session.identity.username, "johndoe");
        assert_eq!(
            session.identity.email.as_deref(),
            Some("johndoe@example.com")
        );
    }

    #[test]
    fn test_authorize_disabled_user() {
        let validator = validator(Some(record(true)), 1);

        assert_eq!(
            validator.authorize(&token_for("johndoe")),
            Err(AuthError::InactiveAccount)
        );
    }
}
