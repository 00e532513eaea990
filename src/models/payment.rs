//! Payment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A payment against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Backend-native identifier
    pub id: String,
    /// Order the payment belongs to
    pub order_id: String,
    /// Paying user's id
    pub customer_id: String,
    pub customer_email: String,
    pub amount: f64,
    /// ISO 4217 currency code
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Processor transaction id, set once processing succeeds
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to record a payment; the store fills in id and timestamps.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: String,
    pub customer_id: String,
    pub customer_email: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

/// Payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Stripe => write!(f, "stripe"),
            PaymentMethod::Paypal => write!(f, "paypal"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stripe" => Ok(PaymentMethod::Stripe),
            "paypal" => Ok(PaymentMethod::Paypal),
            _ => Err(anyhow::anyhow!("Invalid payment method: {}", s)),
        }
    }
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            _ => Err(anyhow::anyhow!("Invalid payment status: {}", s)),
        }
    }
}
