//! Payment API endpoints
//!
//! Handles HTTP requests for payments:
//! - GET /payments - List payments visible to the caller
//! - POST /payments/process - Process a simulated payment

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Payment, PaymentMethod};
use crate::services::ProcessPaymentInput;

/// Request body for processing a payment
#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    pub order_id: String,
    pub customer_email: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
}

/// Response wrapping a single payment
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment: Payment,
}

/// Response wrapping a payment listing
#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
}

/// Build protected payment routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments))
        .route("/process", post(process_payment))
}

/// GET /payments - List payments
///
/// Admins see every payment; other callers see only their own.
async fn list_payments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<PaymentListResponse>, ApiError> {
    let payments = state.payment_service.list_for(&user.0).await?;
    Ok(Json(PaymentListResponse { payments }))
}

/// POST /payments/process - Process a payment for the caller
///
/// The outcome is simulated; both completed and failed payments are
/// recorded and returned with 201.
async fn process_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ProcessPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .payment_service
        .process(
            &user.0,
            ProcessPaymentInput {
                order_id: body.order_id,
                customer_email: body.customer_email,
                amount: body.amount,
                currency: body.currency,
                method: body.method,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse { payment })))
}
