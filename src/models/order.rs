//! Order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Backend-native identifier
    pub id: String,
    /// Owning user's id
    pub customer_id: String,
    /// Customer name, denormalized at creation
    pub customer_name: String,
    /// Customer email, denormalized at creation
    pub customer_email: String,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Order total
    pub total: f64,
    /// Current status
    pub status: OrderStatus,
    /// Shipping address
    pub shipping_address: String,
    /// Tracking number, assigned when the order ships
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Fields needed to create an order; the store fills in id, status and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub shipping_address: String,
}

/// Order lifecycle status.
///
/// Normal progression is pending → processing → shipped → delivered;
/// cancelled is terminal from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid order status: {}", s)),
        }
    }
}
