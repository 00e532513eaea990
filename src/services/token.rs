//! Bearer token signing and verification
//!
//! Tokens are HMAC-SHA256 signed: `base64url(claims_json).base64url(sig)`.
//! Claims carry the user's id, email, and role plus issued-at and expiry
//! timestamps (Unix seconds).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::models::{User, UserRole};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a signed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Token verification failure
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            ttl: Duration::hours(ttl_hours as i64),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC-SHA256 accepts keys of any length
        HmacSha256::new_from_slice(&self.key)
            .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"))
    }

    /// Issue a token for the given user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let payload = serde_json::to_vec(&claims).context("Failed to serialize token claims")?;
        let encoded_payload = BASE64URL_NOPAD.encode(&payload);

        let mut mac = self.mac();
        mac.update(encoded_payload.as_bytes());
        let signature = BASE64URL_NOPAD.encode(&mac.finalize().into_bytes());

        Ok(format!("{}.{}", encoded_payload, signature))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (encoded_payload, encoded_signature) =
            token.split_once('.').ok_or(TokenError::Malformed)?;

        let signature = BASE64URL_NOPAD
            .decode(encoded_signature.as_bytes())
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(encoded_payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = BASE64URL_NOPAD
            .decode(encoded_payload.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: UserRole) -> User {
        User {
            id: "user-1".to_string(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            phone: None,
            password_hash: String::new(),
            role,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = TokenSigner::new("test-secret", 24);
        let token = signer.issue(&test_user(UserRole::Admin)).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signer = TokenSigner::new("secret-a", 24);
        let other = TokenSigner::new("secret-b", 24);
        let token = signer.issue(&test_user(UserRole::User)).unwrap();

        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let signer = TokenSigner::new("test-secret", 24);
        let token = signer.issue(&test_user(UserRole::User)).unwrap();

        // Swap in a different payload while keeping the signature
        let (_, signature) = token.split_once('.').unwrap();
        let forged_claims = Claims {
            sub: "user-1".to_string(),
            email: "a@example.com".to_string(),
            role: UserRole::Admin,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let forged_payload =
            BASE64URL_NOPAD.encode(&serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert_eq!(signer.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_malformed_tokens() {
        let signer = TokenSigner::new("test-secret", 24);

        assert_eq!(signer.verify("no-dot-here"), Err(TokenError::Malformed));
        assert_eq!(
            signer.verify("not base64!.also not!"),
            Err(TokenError::Malformed)
        );
        assert_eq!(signer.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Zero TTL issues a token that is already expired
        let signer = TokenSigner::new("test-secret", 0);
        let token = signer.issue(&test_user(UserRole::User)).unwrap();

        // exp == iat == now; push past it
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
    }
}
