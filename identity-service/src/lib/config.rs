use std::collections::HashSet;
use std::env;
use std::fmt;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
    #[serde(default = "default_max_expiration_minutes")]
    pub max_expiration_minutes: i64,
}

#[derive(Deserialize, Clone)]
pub struct PasswordConfig {
    pub pepper: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Refuse tokens to disabled accounts at login instead of only at resource access.
    #[serde(default)]
    pub reject_disabled_at_login: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://localhost".to_string(),
            ],
        }
    }
}

/// User directory entry loaded from configuration.
///
/// `password` is a development convenience: it is hashed with the pepper
/// at startup. Production configuration should carry `password_hash` only.
#[derive(Deserialize, Clone)]
pub struct SeedUser {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration_minutes() -> i64 {
    30
}

fn default_max_expiration_minutes() -> i64 {
    24 * 60
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expiration_minutes", &self.expiration_minutes)
            .field("max_expiration_minutes", &self.max_expiration_minutes)
            .finish()
    }
}

impl fmt::Debug for PasswordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordConfig")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (IDENTITY__JWT__SECRET, IDENTITY__PASSWORD__PEPPER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: IDENTITY__JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("IDENTITY").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must be set".to_string()));
        }
        if self.jwt.secret.len() < MIN_SECRET_BYTES {
            tracing::warn!(
                length = self.jwt.secret.len(),
                recommended = MIN_SECRET_BYTES,
                "jwt.secret is shorter than recommended"
            );
        }
        if self.password.pepper.is_empty() {
            return Err(ConfigError::Message("password.pepper must be set".to_string()));
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_minutes must be positive".to_string(),
            ));
        }
        if self.jwt.max_expiration_minutes < self.jwt.expiration_minutes {
            return Err(ConfigError::Message(
                "jwt.max_expiration_minutes must not be below jwt.expiration_minutes".to_string(),
            ));
        }

        self.token_codec()?;

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::Message(format!(
                    "duplicate user in configuration: {}",
                    user.username
                )));
            }
            if user.password_hash.is_none() && user.password.is_none() {
                return Err(ConfigError::Message(format!(
                    "user {} needs password_hash or password",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// Build the token codec described by the `jwt` section.
    pub fn token_codec(&self) -> Result<TokenCodec, ConfigError> {
        let codec = TokenCodec::with_algorithm(self.jwt.secret.as_bytes(), &self.jwt.algorithm)
            .map_err(|e| ConfigError::Message(format!("jwt.algorithm: {}", e)))?;

        Ok(codec
            .with_default_ttl(Duration::minutes(self.jwt.expiration_minutes))
            .with_max_ttl(Duration::minutes(self.jwt.max_expiration_minutes)))
    }

    /// Build the authenticator holding the pepper and the signing key.
    pub fn authenticator(&self) -> Result<Authenticator, ConfigError> {
        Ok(Authenticator::new(
            PasswordHasher::new(&self.password.pepper),
            self.token_codec()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig { http_port: 0 },
            jwt: JwtConfig {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                algorithm: default_algorithm(),
                expiration_minutes: default_expiration_minutes(),
                max_expiration_minutes: default_max_expiration_minutes(),
            },
            password: PasswordConfig {
                pepper: "test-pepper".to_string(),
            },
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            users: vec![SeedUser {
                username: "johndoe".to_string(),
                full_name: None,
                email: None,
                password_hash: None,
                password: Some("secret".to_string()),
                disabled: false,
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = config();
        config.jwt.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_pepper_rejected() {
        let mut config = config();
        config.password.pepper = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let mut config = config();
        config.jwt.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_ttls_rejected() {
        let mut config = config();
        config.jwt.max_expiration_minutes = 10;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.jwt.expiration_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let mut config = config();
        let duplicate = config.users[0].clone();
        config.users.push(duplicate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_without_credentials_rejected() {
        let mut config = config();
        config.users[0].password = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_codec_uses_configured_ttl() {
        let mut config = config();
        config.jwt.expiration_minutes = 45;

        let codec = config.token_codec().unwrap();
        assert_eq!(codec.default_ttl(), Duration::minutes(45));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug_output() {
        let rendered = format!("{:?}", config());

        assert!(!rendered.contains("test-secret-key"));
        assert!(!rendered.contains("test-pepper"));
        assert!(!rendered.contains("secret\""));
    }
}
