use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for authentication and session operations.
///
/// Token-level failures (bad signature, malformed, expired) and unknown
/// token subjects all collapse into `Unauthorized`; callers never learn
/// which one happened.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Inactive user")]
    InactiveAccount,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<auth::TokenError> for AuthError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::BadSignature
            | auth::TokenError::Malformed(_)
            | auth::TokenError::Expired => AuthError::Unauthorized,
            auth::TokenError::EncodingFailed(_)
            | auth::TokenError::UnsupportedAlgorithm(_)
            | auth::TokenError::InvalidTtl => AuthError::Internal(err.to_string()),
        }
    }
}
