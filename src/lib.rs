use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
    middleware::from_fn_with_state,
};
use http::{Method, header};
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;
pub mod db;

pub mod models {
    pub mod principal;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod session;
}

pub mod handlers {
    pub mod auth;
    pub mod health;
}

pub mod middleware_layer {
    pub mod gate;
}

pub mod validation {
    pub mod auth;
}

use state::AppState;

/// Builds the application router.
///
/// Credential endpoints sit behind a rate limiter; every page route and
/// the static fallback sit behind the route authorization gate. API
/// routes bypass the gate and authorize themselves.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let credential_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let credential_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(tower_governor::GovernorLayer::new(credential_governor_conf))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/health", get(handlers::health::health))
        .with_state(state.clone());

    Router::new()
        .merge(credential_routes)
        .merge(session_routes)
        .fallback_service(ServeDir::new("public"))
        .layer(from_fn_with_state(
            state,
            middleware_layer::gate::route_gate,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
}
