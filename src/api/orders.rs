//! Order API endpoints
//!
//! Handles HTTP requests for orders:
//! - GET /orders - List orders visible to the caller
//! - POST /orders - Create an order
//! - PATCH /orders/{id}/status - Update an order's status (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Order, OrderItem, OrderStatus};
use crate::services::CreateOrderInput;

/// Request body for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub shipping_address: String,
}

/// Request body for updating an order's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Response wrapping a single order
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// Response wrapping an order listing
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

/// Build protected order routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/", get(list_orders).post(create_order))
}

/// Build admin order routes (requires auth + admin middleware)
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/{id}/status", patch(update_status))
}

/// GET /orders - List orders
///
/// Admins see every order; other callers see only their own.
async fn list_orders(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<OrderListResponse>, ApiError> {
    let orders = state.order_service.list_for(&user.0).await?;
    Ok(Json(OrderListResponse { orders }))
}

/// POST /orders - Create a pending order owned by the caller
async fn create_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .order_service
        .create(
            &user.0,
            CreateOrderInput {
                customer_name: body.customer_name,
                customer_email: body.customer_email,
                items: body.items,
                total: body.total,
                shipping_address: body.shipping_address,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// PATCH /orders/{id}/status - Update an order's status
///
/// Admin only. The first transition to `shipped` assigns a tracking number.
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.order_service.update_status(&id, body.status).await?;
    Ok(Json(OrderResponse { order }))
}
