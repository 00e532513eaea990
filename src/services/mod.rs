//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the entity stores. They own
//! the business rules (credential checks, ownership scoping, simulated
//! payment outcomes) and the error types the API layer maps to statuses.

pub mod auth;
pub mod order;
pub mod password;
pub mod payment;
pub mod token;

pub use auth::{AuthError, AuthService, RegisterInput};
pub use order::{CreateOrderInput, OrderError, OrderService};
pub use password::{hash_password, verify_password};
pub use payment::{PaymentError, PaymentService, ProcessPaymentInput};
pub use token::{Claims, TokenError, TokenSigner};
