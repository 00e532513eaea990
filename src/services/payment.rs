//! Payment service
//!
//! Processing is simulated: no gateway is called. The outcome is a random
//! draw that succeeds 90% of the time, matching a demonstration processor.

use anyhow::Context;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;

use crate::db::stores::PaymentStore;
use crate::models::{NewPayment, Payment, PaymentMethod, PaymentStatus};
use crate::services::token::Claims;

/// Probability that a simulated payment completes
const SUCCESS_RATE: f64 = 0.9;

/// Error types for payment operations
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Input for processing a payment
#[derive(Debug, Clone)]
pub struct ProcessPaymentInput {
    pub order_id: String,
    pub customer_email: String,
    pub amount: f64,
    pub currency: String,
    pub method: PaymentMethod,
}

/// Payment service
pub struct PaymentService {
    payments: Arc<dyn PaymentStore>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentStore>) -> Self {
        Self { payments }
    }

    /// Process a payment for the caller and record the outcome.
    ///
    /// A successful draw yields `completed` with a time-derived transaction
    /// id; a failed draw is recorded as `failed` with no transaction id.
    pub async fn process(
        &self,
        claims: &Claims,
        input: ProcessPaymentInput,
    ) -> Result<Payment, PaymentError> {
        let succeeded = rand::thread_rng().gen_bool(SUCCESS_RATE);
        let (status, transaction_id) = if succeeded {
            (
                PaymentStatus::Completed,
                Some(format!("txn_{}", Utc::now().timestamp_millis())),
            )
        } else {
            (PaymentStatus::Failed, None)
        };

        let payment = self
            .payments
            .create(NewPayment {
                order_id: input.order_id,
                customer_id: claims.sub.clone(),
                customer_email: input.customer_email,
                amount: input.amount,
                currency: input.currency,
                method: input.method,
                status,
                transaction_id,
            })
            .await
            .context("Failed to record payment")?;

        tracing::info!(
            payment_id = %payment.id,
            order_id = %payment.order_id,
            status = %payment.status,
            "Payment processed"
        );
        Ok(payment)
    }

    /// List payments visible to the caller: admins see everything, users
    /// see their own.
    pub async fn list_for(&self, claims: &Claims) -> Result<Vec<Payment>, PaymentError> {
        let filter = if claims.is_admin() {
            None
        } else {
            Some(claims.sub.as_str())
        };

        Ok(self
            .payments
            .list(filter)
            .await
            .context("Failed to list payments")?)
    }
}
