//! User model
//!
//! Accounts are created unverified at registration and flip to verified after
//! the one-time-code check. The password is stored as an argon2id hash only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Backend-native identifier (UUID text or ObjectId hex)
    pub id: String,
    /// Email address (unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Optional phone number, used only as the OTP delivery target
    pub phone: Option<String>,
    /// Password hash (argon2id, PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role
    pub role: UserRole,
    /// Whether the account passed the one-time-code check
    pub is_verified: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user is an administrator
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Fields needed to create a user; the store fills in id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_verified: bool,
}

/// User role for authorization.
///
/// Admins see every order and payment and may change order status;
/// regular users only see their own records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access
    Admin,
    /// Regular customer
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}
