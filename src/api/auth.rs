//! Authentication API endpoints
//!
//! Handles HTTP requests for user authentication:
//! - POST /auth/register - User registration
//! - POST /auth/verify-otp - One-time-code verification
//! - POST /auth/login - User login
//! - GET /auth/verify - Validate the caller's token

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::User;
use crate::services::RegisterInput;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Response for a pending registration awaiting verification
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub temp_user_id: String,
}

/// Request body for one-time-code verification
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub user_id: String,
    pub otp: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Response for user info
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role.to_string(),
            is_verified: user.is_verified,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/login", post(login))
}

/// Build protected auth routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/verify", get(verify))
}

/// POST /auth/register - User registration
///
/// Creates an unverified account and returns its id so the client can
/// complete the one-time-code step.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth_service
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            phone: body.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "OTP sent. Verify to activate your account.".to_string(),
            temp_user_id: user.id,
        }),
    ))
}

/// POST /auth/verify-otp - Verify a pending account
async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = state.auth_service.verify_otp(&body.user_id, &body.otp).await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/login - User login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = state.auth_service.login(&body.email, &body.password).await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /auth/verify - Return the user behind a valid token
///
/// Requires authentication.
async fn verify(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .auth_service
        .fetch_user(&user.0.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}
