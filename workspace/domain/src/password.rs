//! One-way password hashing with argon2id.
//!
//! Stored values are PHC strings (`$argon2id$v=19$...`) carrying their own
//! salt and cost parameters. The plaintext never leaves this module.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{DomainError, Result};

/// Shortest password accepted on create and update.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Rejects passwords shorter than [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(plain: &str) -> Result<()> {
    if plain.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(format!(
            "Ensure password has at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hashes a password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|err| DomainError::PasswordHash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a candidate password against a stored PHC hash. Malformed
/// stored values never verify.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_original_password() {
        let stored = hash_password("testpassword123").unwrap();
        assert!(verify_password("testpassword123", &stored));
        assert!(!verify_password("testpassword124", &stored));
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let stored = hash_password("Testpass123").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("Testpass123"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("samepass").unwrap();
        let second = hash_password("samepass").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("samepass", &first));
        assert!(verify_password("samepass", &second));
    }

    #[test]
    fn test_malformed_stored_hash() {
        assert!(!verify_password("pass", "nocolonshere"));
        assert!(!verify_password("pass", "zz:zz"));
        assert!(!verify_password("pass", "$argon2id$v=19$garbage"));
        assert!(!verify_password("pass", ""));
    }

    #[test]
    fn test_legacy_sha256_format_is_rejected() {
        let legacy = format!("{}:{}", "00".repeat(16), "ab".repeat(32));
        assert!(!verify_password("pass", &legacy));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("tp").is_err());
        assert!(validate_password("abc").is_err());
        assert!(validate_password("abcd").is_ok());
        assert!(validate_password("newpass123").is_ok());
    }
}
