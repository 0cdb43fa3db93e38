use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::read_own_items::read_own_items;
use super::handlers::read_users_me::read_users_me;
use super::middleware::authenticate as auth_middleware;
use crate::config::CorsConfig;
use crate::domain::user::service::AuthenticationService;
use crate::domain::user::session::SessionValidator;
use crate::outbound::repositories::InMemoryUserStore;

#[derive(Clone)]
pub struct AppState {
    pub authentication_service: Arc<AuthenticationService<InMemoryUserStore>>,
    pub session_validator: Arc<SessionValidator<InMemoryUserStore>>,
}

pub fn create_router(
    authentication_service: Arc<AuthenticationService<InMemoryUserStore>>,
    session_validator: Arc<SessionValidator<InMemoryUserStore>>,
    cors: &CorsConfig,
) -> Router {
    let state = AppState {
        authentication_service,
        session_validator,
    };

    let public_routes = Router::new().route("/token", post(login));

    let protected_routes = Router::new()
        .route("/users/me", get(read_users_me))
        .route("/users/me/", get(read_users_me))
        .route("/users/me/items", get(read_own_items))
        .route("/users/me/items/", get(read_own_items))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Spans never record request headers.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                tracing::warn!("Wildcard CORS origin ignored, credentials need explicit origins");
                return None;
            }
            HeaderValue::from_str(origin)
                .map_err(|e| {
                    tracing::warn!(origin = %origin, error = %e, "Invalid CORS origin ignored")
                })
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
