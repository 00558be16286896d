//! # rf-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`, backing the login form
//! and the seed binary's demo account.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rf_core::traits::AuthProvider;

#[derive(Default)]
pub struct SimpleAuthProvider;

impl SimpleAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

impl AuthProvider for SimpleAuthProvider {
    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("argon2 hashing failed: {e}"))?;
        Ok(hash.to_string())
    }

    /// A malformed stored hash verifies as false rather than erroring; the
    /// login path treats both the same way.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok()
    }
}
