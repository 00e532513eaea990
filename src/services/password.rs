//! Password hashing
//!
//! Argon2id with the crate's secure defaults and a random salt per hash.
//! Hashes are stored in PHC string format.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id.
///
/// Returns the hash as a PHC string (algorithm, parameters, salt, hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a wrong password; errors only when the stored hash
/// itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e))
            .context("Password verification error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2id_hash() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"), "Hash should use Argon2id");
    }

    #[test]
    fn test_hash_password_produces_different_hashes() {
        let hash1 = hash_password("same_password").expect("Failed to hash password");
        let hash2 = hash_password("same_password").expect("Failed to hash password");

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("Failed to hash password");

        let result =
            verify_password("correct_password", &hash).expect("Verification should not error");
        assert!(result);
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("Failed to hash password");

        let result =
            verify_password("wrong_password", &hash).expect("Verification should not error");
        assert!(!result);
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "invalid_hash_format");
        assert!(result.is_err(), "Invalid hash format should return error");
    }

    #[test]
    fn test_hash_password_unicode() {
        let password = "contraseña🔐";
        let hash = hash_password(password).expect("Failed to hash unicode password");

        let result = verify_password(password, &hash).expect("Verification should not error");
        assert!(result);
    }

    #[test]
    fn test_password_hash_not_equal_to_password() {
        let password = "my_secret_password";
        let hash = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(!hash.contains(password));
    }
}
