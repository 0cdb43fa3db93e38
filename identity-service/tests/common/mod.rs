use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenCodec;
use identity_service::config::CorsConfig;
use identity_service::domain::user::models::CredentialRecord;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::service::AuthenticationService;
use identity_service::domain::user::session::SessionValidator;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserStore;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PEPPER: &str = "test-pepper";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application with the default user directory
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawn the application, optionally refusing tokens to disabled accounts at login
    pub async fn spawn_with(reject_disabled_at_login: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(
            PasswordHasher::new(PEPPER),
            TokenCodec::new(JWT_SECRET),
        ));

        let user_store = Arc::new(InMemoryUserStore::new(vec![
            record(&authenticator, "johndoe", "secret", "John Doe", false),
            record(&authenticator, "alice", "secret2", "Alice Wonderson", true),
        ]));

        let authentication_service = Arc::new(
            AuthenticationService::new(Arc::clone(&user_store), Arc::clone(&authenticator))
                .with_disabled_login_rejection(reject_disabled_at_login),
        );
        let session_validator = Arc::new(SessionValidator::new(
            Arc::clone(&user_store),
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            authentication_service,
            session_validator,
            &CorsConfig::default(),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Post the OAuth2 password form to `/token`
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/token")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the issued access token
    pub async fn access_token(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}

fn record(
    authenticator: &Authenticator,
    username: &str,
    password: &str,
    full_name: &str,
    disabled: bool,
) -> CredentialRecord {
    CredentialRecord {
        username: username.to_string(),
        full_name: Some(full_name.to_string()),
        email: Some(
            EmailAddress::new(format!("{}@example.com", username)).expect("Invalid test email"),
        ),
        password_hash: authenticator
            .hash_password(password)
            .expect("Failed to hash test password"),
        disabled,
    }
}
