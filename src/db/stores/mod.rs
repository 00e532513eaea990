//! Entity stores
//!
//! One trait per entity, with a PostgreSQL and a MongoDB implementation
//! each. `Stores::new` inspects the active backend exactly once and hands
//! back trait objects; nothing downstream branches on the backend again.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::BackendKind;
use crate::db::DynDatabasePool;
use crate::models::{NewOrder, NewPayment, NewUser, Order, OrderStatus, Payment, User};

pub mod memory;
pub mod order;
pub mod payment;
pub mod user;

pub use order::{MongoOrderStore, PgOrderStore};
pub use payment::{MongoPaymentStore, PgPaymentStore};
pub use user::{MongoUserStore, PgUserStore};

/// User data access
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user; the store generates the id and timestamps
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user by id; an unparseable id is treated as not found
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Flip the verified flag; returns false when the user doesn't exist
    async fn mark_verified(&self, id: &str) -> Result<bool>;
}

/// Order data access
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create a new pending order
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// List orders newest first, optionally filtered by customer id
    async fn list(&self, customer_id: Option<&str>) -> Result<Vec<Order>>;

    /// Find an order by id
    async fn find_by_id(&self, id: &str) -> Result<Option<Order>>;

    /// Update an order's status; returns false when the order doesn't exist.
    ///
    /// Transitioning to `shipped` assigns a time-derived tracking number
    /// unless one is already set.
    async fn update_status(&self, id: &str, status: OrderStatus) -> Result<bool>;
}

/// Payment data access
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Record a payment
    async fn create(&self, payment: NewPayment) -> Result<Payment>;

    /// List payments newest first, optionally filtered by customer id
    async fn list(&self, customer_id: Option<&str>) -> Result<Vec<Payment>>;
}

/// Generate the tracking number assigned when an order ships.
///
/// Time-derived and not globally unique; kept as the documented format.
pub(crate) fn new_tracking_number() -> String {
    format!("TRK{}", chrono::Utc::now().timestamp_millis())
}

/// The set of stores backing the services, selected once at startup.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub orders: Arc<dyn OrderStore>,
    pub payments: Arc<dyn PaymentStore>,
}

impl Stores {
    /// Build the stores for the pool's active backend.
    pub fn new(pool: &DynDatabasePool) -> Result<Self> {
        match pool.kind() {
            BackendKind::Postgresql => {
                let pg = pool
                    .as_postgres()
                    .ok_or_else(|| anyhow!("PostgreSQL backend selected but no pool available"))?
                    .clone();
                Ok(Self {
                    users: Arc::new(PgUserStore::new(pg.clone())),
                    orders: Arc::new(PgOrderStore::new(pg.clone())),
                    payments: Arc::new(PgPaymentStore::new(pg)),
                })
            }
            BackendKind::Mongodb => {
                let db = pool
                    .as_mongo()
                    .ok_or_else(|| anyhow!("MongoDB backend selected but no database available"))?
                    .clone();
                Ok(Self {
                    users: Arc::new(MongoUserStore::new(db.clone())),
                    orders: Arc::new(MongoOrderStore::new(db.clone())),
                    payments: Arc::new(MongoPaymentStore::new(db)),
                })
            }
        }
    }

    /// Build stores over in-memory state; used by tests.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserStore::new()),
            orders: Arc::new(memory::MemoryOrderStore::new()),
            payments: Arc::new(memory::MemoryPaymentStore::new()),
        }
    }
}
