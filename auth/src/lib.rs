//! Authentication primitives library
//!
//! Provides the credential and token building blocks used by the identity service:
//! - Peppered password hashing (Argon2id)
//! - Signed, expiring access tokens (compact JWS, HMAC)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new("server-side-pepper");
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let issued = codec.issue("johndoe", None).unwrap();
//! let claims = codec.decode(&issued.token).unwrap();
//! assert_eq!(claims.sub, "johndoe");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher, TokenCodec};
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new("server-side-pepper"),
//!     TokenCodec::new(b"secret_key_at_least_32_bytes_long!"),
//! );
//!
//! // Seed: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", Some(&hash), "johndoe").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "johndoe");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::IssuedToken;
pub use token::TokenCodec;
pub use token::TokenError;
