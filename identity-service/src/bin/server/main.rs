use std::sync::Arc;

use identity_service::config::Config;
use identity_service::domain::user::service::AuthenticationService;
use identity_service::domain::user::session::SessionValidator;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        algorithm = %config.jwt.algorithm,
        expiration_minutes = config.jwt.expiration_minutes,
        reject_disabled_at_login = config.auth.reject_disabled_at_login,
        users = config.users.len(),
        "Configuration loaded"
    );

    let authenticator = Arc::new(config.authenticator()?);
    let user_store = Arc::new(InMemoryUserStore::from_seed(&config.users, &authenticator)?);
    tracing::info!(users = user_store.len(), "User directory loaded");

    let authentication_service = Arc::new(
        AuthenticationService::new(Arc::clone(&user_store), Arc::clone(&authenticator))
            .with_disabled_login_rejection(config.auth.reject_disabled_at_login),
    );
    let session_validator = Arc::new(SessionValidator::new(
        Arc::clone(&user_store),
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(authentication_service, session_validator, &config.cors);

    match axum::serve(http_listener, http_application).await {
        Ok(()) => tracing::info!("Server exited successfully"),
        Err(e) => tracing::error!(error = %e, "Server error"),
    };

    Ok(())
}
