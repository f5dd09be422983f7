use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// hash_password
///
/// Produces a salted Argon2 PHC string. The salt is fresh per call, so hashing the same
/// plaintext twice yields two different strings that both verify.
pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Fatal(format!("password hashing failed: {e}")))
}

/// verify_password
///
/// Constant-time comparison of `plaintext` against a stored PHC string. An unparsable hash is
/// a mismatch, not an error.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}
