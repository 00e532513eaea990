//! Order service

use anyhow::Context;
use std::sync::Arc;

use crate::db::stores::OrderStore;
use crate::models::{NewOrder, Order, OrderItem, OrderStatus};
use crate::services::token::Claims;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Input for creating an order
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub shipping_address: String,
}

/// Order service
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    /// Create a pending order owned by the caller.
    pub async fn create(
        &self,
        claims: &Claims,
        input: CreateOrderInput,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .create(NewOrder {
                customer_id: claims.sub.clone(),
                customer_name: input.customer_name,
                customer_email: input.customer_email,
                items: input.items,
                total: input.total,
                shipping_address: input.shipping_address,
            })
            .await
            .context("Failed to create order")?;

        tracing::info!(order_id = %order.id, customer_id = %order.customer_id, "Order created");
        Ok(order)
    }

    /// List orders visible to the caller: admins see everything, users
    /// see their own.
    pub async fn list_for(&self, claims: &Claims) -> Result<Vec<Order>, OrderError> {
        let filter = if claims.is_admin() {
            None
        } else {
            Some(claims.sub.as_str())
        };

        Ok(self
            .orders
            .list(filter)
            .await
            .context("Failed to list orders")?)
    }

    /// Update an order's status, returning the updated order.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, OrderError> {
        let updated = self
            .orders
            .update_status(id, status)
            .await
            .context("Failed to update order status")?;

        if !updated {
            return Err(OrderError::NotFound);
        }

        self.orders
            .find_by_id(id)
            .await
            .context("Failed to reload order")?
            .ok_or(OrderError::NotFound)
    }
}
