//! API middleware
//!
//! Authentication (bearer token verification) and authorization (role
//! checking) middleware, plus the shared application state and the API
//! error shape every handler returns.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::auth::AuthError;
use crate::services::order::OrderError;
use crate::services::payment::PaymentError;
use crate::services::token::{Claims, TokenSigner};
use crate::services::{AuthService, OrderService, PaymentService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub auth_service: Arc<AuthService>,
    pub order_service: Arc<OrderService>,
    pub payment_service: Arc<PaymentService>,
    pub tokens: TokenSigner,
}

/// Verified claims extracted from the request's bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::conflict(err.to_string()),
            AuthError::InvalidCredentials | AuthError::Unverified => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::InvalidOtp => ApiError::validation_error(err.to_string()),
            AuthError::UserNotFound => ApiError::not_found(err.to_string()),
            AuthError::Internal(e) => {
                tracing::error!("Auth service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => ApiError::not_found(err.to_string()),
            OrderError::Internal(e) => {
                tracing::error!("Order service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Internal(e) => {
                tracing::error!("Payment service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

/// Extract the bearer token from a request
fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware.
///
/// Missing and unverifiable tokens are not distinguished; both yield 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let claims = verify_token(&state.tokens, token)?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}

fn verify_token(tokens: &TokenSigner, token: &str) -> Result<Claims, ApiError> {
    tokens
        .verify(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

/// Admin authorization middleware; runs after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.0.is_admin() {
        return Err(ApiError::forbidden("Admin privileges required"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};

    fn request_with_auth(value: &str) -> Request<Body> {
        Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let request = request_with_auth("Bearer test-token-123");
        assert_eq!(extract_bearer_token(&request), Some("test-token-123"));
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let request = request_with_auth("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_token(&request).is_none());
    }

    #[test]
    fn test_api_error_codes() {
        assert_eq!(ApiError::unauthorized("x").error.code, "UNAUTHORIZED");
        assert_eq!(ApiError::forbidden("x").error.code, "FORBIDDEN");
        assert_eq!(ApiError::not_found("x").error.code, "NOT_FOUND");
        assert_eq!(ApiError::conflict("x").error.code, "CONFLICT");
        assert_eq!(
            ApiError::validation_error("x").error.code,
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(ApiError::from(AuthError::EmailTaken).error.code, "CONFLICT");
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).error.code,
            "UNAUTHORIZED"
        );
        assert_eq!(
            ApiError::from(AuthError::Unverified).error.code,
            "UNAUTHORIZED"
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidOtp).error.code,
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ApiError::from(AuthError::UserNotFound).error.code,
            "NOT_FOUND"
        );
    }
}
