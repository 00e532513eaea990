//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the platform:
//! - Auth API endpoints (register, OTP verification, login, token check)
//! - Order API endpoints
//! - Payment API endpoints
//! - Database health endpoint

pub mod auth;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod payments;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need admin role)
    let admin_routes = Router::new()
        .nest("/orders", orders::admin_router())
        .route_layer(axum_middleware::from_fn(middleware::require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (need auth but not admin)
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/orders", orders::protected_router())
        .nest("/payments", payments::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .nest("/auth", auth::public_router())
        .nest("/health", health::router())
        .merge(admin_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .merge(build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
