//! Argon2 password hashing with a per-identity stored salt.
//!
//! Each identity keeps its own salt so the hash is deterministic for a given
//! `(password, salt)` pair, which lets the reset flow re-salt on every
//! password change.

use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};

/// Generate a fresh random salt, encoded as a PHC base64 string.
#[must_use]
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

/// Hash a password with the given stored salt.
///
/// # Errors
/// Returns an error if the salt is not valid PHC base64 or hashing fails.
pub fn hash_password(password: &str, salt: &str) -> Result<String> {
    let salt = SaltString::from_b64(salt).map_err(|err| anyhow!("invalid salt: {err}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored PHC hash string.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_for_same_salt() {
        let salt = generate_salt();
        let first = hash_password("Sup3r-secret", &salt).unwrap();
        let second = hash_password("Sup3r-secret", &salt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let first = hash_password("Sup3r-secret", &generate_salt()).unwrap();
        let second = hash_password("Sup3r-secret", &generate_salt()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_accepts_correct_password() {
        let salt = generate_salt();
        let hash = hash_password("Sup3r-secret", &salt).unwrap();
        assert!(verify_password("Sup3r-secret", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("Sup3r-secret", "not-a-phc-string"));
    }

    #[test]
    fn invalid_salt_is_an_error() {
        assert!(hash_password("Sup3r-secret", "*** not base64 ***").is_err());
    }
}
