//! In-memory store implementations
//!
//! Back the service and router tests with plain vectors behind a mutex,
//! honoring the same contracts as the real backends (newest-first listing,
//! tracking-number synthesis, opaque generated ids).

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use super::{new_tracking_number, OrderStore, PaymentStore, UserStore};
use crate::models::{NewOrder, NewPayment, NewUser, Order, OrderStatus, Payment, User};

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: user.email,
            name: user.name,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            is_verified: user.is_verified,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.lock().unwrap();
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn mark_verified(&self, id: &str) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_verified = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory order store
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: order.customer_id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            items: order.items,
            total: order.total,
            status: OrderStatus::Pending,
            shipping_address: order.shipping_address,
            tracking_number: None,
            created_at: now,
            updated_at: now,
        };

        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(order)
    }

    async fn list(&self, customer_id: Option<&str>) -> Result<Vec<Order>> {
        let orders = self.orders.lock().unwrap();
        // Insertion order doubles as creation order
        Ok(orders
            .iter()
            .rev()
            .filter(|o| customer_id.map_or(true, |id| o.customer_id == id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<bool> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                if status == OrderStatus::Shipped && order.tracking_number.is_none() {
                    order.tracking_number = Some(new_tracking_number());
                }
                order.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory payment store
#[derive(Default)]
pub struct MemoryPaymentStore {
    payments: Mutex<Vec<Payment>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn create(&self, payment: NewPayment) -> Result<Payment> {
        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            order_id: payment.order_id,
            customer_id: payment.customer_id,
            customer_email: payment.customer_email,
            amount: payment.amount,
            currency: payment.currency,
            method: payment.method,
            status: payment.status,
            transaction_id: payment.transaction_id,
            created_at: now,
            updated_at: now,
        };

        let mut payments = self.payments.lock().unwrap();
        payments.push(payment.clone());
        Ok(payment)
    }

    async fn list(&self, customer_id: Option<&str>) -> Result<Vec<Payment>> {
        let payments = self.payments.lock().unwrap();
        Ok(payments
            .iter()
            .rev()
            .filter(|p| customer_id.map_or(true, |id| p.customer_id == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, PaymentMethod, PaymentStatus, UserRole};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            phone: None,
            password_hash: "hash".to_string(),
            role: UserRole::User,
            is_verified: false,
        }
    }

    fn new_order(customer_id: &str) -> NewOrder {
        NewOrder {
            customer_id: customer_id.to_string(),
            customer_name: "Test User".to_string(),
            customer_email: "test@example.com".to_string(),
            items: vec![OrderItem {
                name: "Widget".to_string(),
                quantity: 1,
                price: 9.99,
            }],
            total: 9.99,
            shipping_address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_create_and_find() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("a@example.com")).await.unwrap();

        assert!(!created.id.is_empty());
        assert!(!created.is_verified);

        let by_email = store.find_by_email("a@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, created.id);

        let by_id = store.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id.unwrap().email, "a@example.com");

        assert!(store.find_by_email("missing@example.com").await.unwrap().is_none());
        assert!(store.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_mark_verified() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("a@example.com")).await.unwrap();

        assert!(store.mark_verified(&created.id).await.unwrap());
        let user = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert!(user.is_verified);

        assert!(!store.mark_verified("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_order_listing_newest_first_and_filter() {
        let store = MemoryOrderStore::new();
        let first = store.create(new_order("cust-1")).await.unwrap();
        let second = store.create(new_order("cust-2")).await.unwrap();
        let third = store.create(new_order("cust-1")).await.unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, third.id);
        assert_eq!(all[2].id, first.id);

        let mine = store.list(Some("cust-1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.customer_id == "cust-1"));

        let none = store.list(Some("cust-3")).await.unwrap();
        assert!(none.is_empty());
        let _ = second;
    }

    #[tokio::test]
    async fn test_order_status_update_assigns_tracking_once() {
        let store = MemoryOrderStore::new();
        let order = store.create(new_order("cust-1")).await.unwrap();
        assert!(order.tracking_number.is_none());

        assert!(store
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap());
        let shipped = store.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
        let tracking = shipped.tracking_number.clone().unwrap();
        assert!(tracking.starts_with("TRK"));

        // Re-shipping keeps the existing number
        assert!(store
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap());
        let again = store.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(again.tracking_number.unwrap(), tracking);

        // Other transitions never touch it
        assert!(store
            .update_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap());
        let delivered = store.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(delivered.tracking_number.unwrap(), tracking);

        assert!(!store
            .update_status("missing", OrderStatus::Cancelled)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_payment_listing_newest_first_and_filter() {
        let store = MemoryPaymentStore::new();

        let make = |customer: &str| NewPayment {
            order_id: "order-1".to_string(),
            customer_id: customer.to_string(),
            customer_email: "test@example.com".to_string(),
            amount: 42.0,
            currency: "USD".to_string(),
            method: PaymentMethod::Stripe,
            status: PaymentStatus::Completed,
            transaction_id: Some("txn_1".to_string()),
        };

        let first = store.create(make("cust-1")).await.unwrap();
        let second = store.create(make("cust-1")).await.unwrap();
        store.create(make("cust-2")).await.unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let mine = store.list(Some("cust-1")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id);
        assert_eq!(mine[1].id, first.id);
    }
}
