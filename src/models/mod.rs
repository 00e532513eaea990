//! Domain entities
//!
//! Entities are backend-agnostic: identifiers are opaque strings supplied by
//! whichever store created the record (UUID text on PostgreSQL, ObjectId hex
//! on MongoDB), and all status fields are closed enums so no store can
//! persist a value outside the enumerated set.

mod order;
mod payment;
mod user;

pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use payment::{NewPayment, Payment, PaymentMethod, PaymentStatus};
pub use user::{NewUser, User, UserRole};
