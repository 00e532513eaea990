//! Authentication service
//!
//! Registration, one-time-code verification, and login. Verification is a
//! demonstration stub: the code is the fixed constant `123456`, logged at
//! registration instead of being delivered anywhere.

use anyhow::Context;
use std::sync::Arc;

use crate::db::stores::UserStore;
use crate::models::{NewUser, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenSigner;

/// The fixed one-time code accepted by verification.
const FIXED_OTP: &str = "123456";

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email already registered
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Bad email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but never passed the one-time-code check
    #[error("Please verify your account before logging in")]
    Unverified,

    /// Wrong one-time code
    #[error("Invalid verification code")]
    InvalidOtp,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    /// Register a new, unverified user.
    ///
    /// Logs the one-time code in place of delivering it.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        if self
            .users
            .find_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = self
            .users
            .create(NewUser {
                email: input.email,
                name: input.name,
                phone: input.phone,
                password_hash,
                role: UserRole::User,
                is_verified: false,
            })
            .await
            .context("Failed to create user")?;

        let target = user.phone.as_deref().unwrap_or(&user.email);
        tracing::info!("OTP sent to {}: {}", target, FIXED_OTP);

        Ok(user)
    }

    /// Verify a pending account with its one-time code.
    ///
    /// Only the fixed code is accepted. Flips the verified flag (a no-op on
    /// an already-verified account) and returns the user with a fresh token.
    pub async fn verify_otp(&self, user_id: &str, otp: &str) -> Result<(User, String), AuthError> {
        if otp != FIXED_OTP {
            return Err(AuthError::InvalidOtp);
        }

        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .context("Failed to load user")?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_verified {
            if !self
                .users
                .mark_verified(user_id)
                .await
                .context("Failed to mark user verified")?
            {
                return Err(AuthError::UserNotFound);
            }
            user.is_verified = true;
        }

        let token = self.tokens.issue(&user)?;
        Ok((user, token))
    }

    /// Authenticate with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .context("Failed to load user")?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).context("Password check failed")? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(AuthError::Unverified);
        }

        let token = self.tokens.issue(&user)?;
        Ok((user, token))
    }

    /// Load the user behind a set of verified claims.
    pub async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await
            .context("Failed to load user")?)
    }
}
