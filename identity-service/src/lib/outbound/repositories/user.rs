use std::collections::HashMap;

use anyhow::Context;
use auth::Authenticator;

use crate::config::SeedUser;
use crate::domain::user::models::CredentialRecord;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::UserStore;

/// User directory held in memory.
///
/// Built once at startup and never mutated afterwards, so it is shared
/// across requests without locking.
pub struct InMemoryUserStore {
    users: HashMap<String, CredentialRecord>,
}

impl InMemoryUserStore {
    pub fn new(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();

        Self { users }
    }

    /// Build the directory from configured users.
    ///
    /// Users given a plaintext `password` are hashed here with the
    /// authenticator's pepper.
    ///
    /// # Errors
    /// * Invalid email address or hashing failure for any seed user
    pub fn from_seed(users: &[SeedUser], authenticator: &Authenticator) -> anyhow::Result<Self> {
        let records = users
            .iter()
            .map(|user| Self::seed_record(user, authenticator))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self::new(records))
    }

    fn seed_record(
        user: &SeedUser,
        authenticator: &Authenticator,
    ) -> anyhow::Result<CredentialRecord> {
        let email = user
            .email
            .clone()
            .map(EmailAddress::new)
            .transpose()
            .with_context(|| format!("Invalid email for user {}", user.username))?;

        let password_hash = match (&user.password_hash, &user.password) {
            (Some(hash), _) => hash.clone(),
            (None, Some(password)) => {
                tracing::warn!(
                    username = %user.username,
                    "Hashing plaintext seed password; use password_hash outside development"
                );
                authenticator
                    .hash_password(password)
                    .with_context(|| format!("Failed to hash password for user {}", user.username))?
            }
            (None, None) => anyhow::bail!("User {} has no credentials", user.username),
        };

        Ok(CredentialRecord {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email,
            password_hash,
            disabled: user.disabled,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn get(&self, username: &str) -> Option<CredentialRecord> {
        self.users.get(username).cloned()
    }
}
