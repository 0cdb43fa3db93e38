use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

const DEFAULT_TTL_MINUTES: i64 = 30;
const DEFAULT_MAX_TTL_MINUTES: i64 = 24 * 60;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies compact JWS access tokens.
///
/// Uses a single symmetric key for the lifetime of the process. Only the
/// HMAC family is accepted; rotating the key invalidates every token issued
/// under the previous one.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
    max_ttl: Duration,
}

impl TokenCodec {
    /// Create a new codec signing with HS256.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key (at least 32 bytes recommended)
    ///
    /// # Returns
    /// TokenCodec with a 30 minute default lifetime
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            default_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            max_ttl: Duration::minutes(DEFAULT_MAX_TTL_MINUTES),
        }
    }

    /// Create a new codec with a named HMAC algorithm (`HS256`, `HS384`, `HS512`).
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Name is unknown or not an HMAC algorithm
    pub fn with_algorithm(secret: &[u8], algorithm: &str) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self {
                algorithm,
                ..Self::new(secret)
            }),
            other => Err(TokenError::UnsupportedAlgorithm(format!("{:?}", other))),
        }
    }

    /// Set the lifetime used when the caller gives none.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the upper bound applied to every requested lifetime.
    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = ttl;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` expiring after `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Username placed in the `sub` claim
    /// * `ttl` - Requested lifetime; the default is used when `None`, and
    ///   anything above the maximum is clamped to it
    ///
    /// # Returns
    /// Signed token and the claims it encodes
    ///
    /// # Errors
    /// * `InvalidTtl` - Requested lifetime is zero or negative
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, TokenError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }

        let claims = Claims::for_subject(subject, ttl.min(self.max_ttl));
        let token = self.encode(&claims)?;

        Ok(IssuedToken { token, claims })
    }

    /// Sign already-built claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token.
    ///
    /// The signature is checked before any claim is looked at; expiry is
    /// enforced with zero leeway.
    ///
    /// # Errors
    /// * `BadSignature` - Signature does not match the key
    /// * `Expired` - `exp` is not in the future
    /// * `Malformed` - Token structure, encoding, algorithm or claims are invalid
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
