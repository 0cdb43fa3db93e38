use std::fmt;
use std::str::FromStr;

use crate::user::errors::EmailError;

/// Stored credential record.
///
/// Owned by the user directory; read-only from the point of view of
/// authentication and session validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub password_hash: String,
    pub disabled: bool,
}

impl CredentialRecord {
    /// Project the record onto the fields safe to hand back to a caller.
    pub fn identity(&self) -> PublicIdentity {
        PublicIdentity {
            username: self.username.clone(),
            email: self.email.as_ref().map(|e| e.as_str().to_string()),
            full_name: self.full_name.clone(),
            disabled: self.disabled,
        }
    }
}

/// The subset of a credential record that may leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIdentity {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
}

/// Request-scoped result of a successful bearer token check.
///
/// Lives in the request extensions for the duration of one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub identity: PublicIdentity,
}

/// Access token handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

impl AccessToken {
    pub const BEARER: &'static str = "bearer";

    pub fn bearer(access_token: String, expires_at: i64) -> Self {
        Self {
            access_token,
            token_type: Self::BEARER,
            expires_at,
        }
    }
}

/// Steps a presented token goes through before access is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    TokenPresented,
    Decoded,
    UserResolved,
    ActiveChecked,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            SessionStage::TokenPresented => "token_presented",
            SessionStage::Decoded => "decoded",
            SessionStage::UserResolved => "user_resolved",
            SessionStage::ActiveChecked => "active_checked",
        };
        f.write_str(stage)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    ///
    /// # Returns
    /// Email string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
