//! Argon2id password hashing. Only the PHC string is ever stored.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use crate::errors::{CatalogError, Result};

/// Hash a password using Argon2id
///
/// # Errors
///
/// Internal error when the hasher fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CatalogError::internal(format!("password hashing failed: {e}")))
}

/// Verify a password against its stored hash
///
/// # Errors
///
/// Internal error when the stored hash is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CatalogError::internal(format!("stored password hash unreadable: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Internal error when the hasher fails or its task is lost.
pub async fn hash_password_async(password: String) -> Result<String> {
    spawn_blocking(move || hash_password(&password)).await
}

/// [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Internal error when the stored hash is unreadable or the task is lost.
pub async fn verify_password_async(password: String, hash: String) -> Result<bool> {
    spawn_blocking(move || verify_password(&password, &hash)).await
}

async fn spawn_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CatalogError::internal(format!("password task failed: {e}")))?
}
