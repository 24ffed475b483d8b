//! PBKDF2-HMAC-SHA256 password hashing, stored as PHC strings
//! (`$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`).

use crate::error::{GatehouseError, Result};
use pbkdf2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use pbkdf2::{Params, Pbkdf2};
use rand::RngCore;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub fn hash_password(password: &str, iterations: u32) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt).map_err(hash_error)?;

    let params = Params {
        rounds: iterations,
        output_length: HASH_LEN,
    };
    let hash = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map_err(hash_error)?;
    Ok(hash.to_string())
}

/// `Ok(false)` for a wrong password; `Err` only when `encoded` is unusable.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool> {
    let parsed = PasswordHash::new(encoded).map_err(hash_error)?;
    match Pbkdf2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(hash_error(e)),
    }
}

fn hash_error(e: password_hash::Error) -> GatehouseError {
    GatehouseError::PasswordHash(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the tests fast.
    const ROUNDS: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let encoded = hash_password("correct horse", ROUNDS).unwrap();
        assert!(encoded.starts_with("$pbkdf2-sha256$i=1000,l=32$"));
        assert!(verify_password("correct horse", &encoded).unwrap());
    }

    #[test]
    fn wrong_password_fails() {
        let encoded = hash_password("correct horse", ROUNDS).unwrap();
        assert!(!verify_password("battery staple", &encoded).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password("same", ROUNDS).unwrap(),
            hash_password("same", ROUNDS).unwrap()
        );
    }

    #[test]
    fn iteration_count_is_read_from_encoding() {
        let encoded = hash_password("pw-for-rounds", 2_000).unwrap();
        assert!(encoded.contains("i=2000"));
        assert!(verify_password("pw-for-rounds", &encoded).unwrap());
    }

    #[test]
    fn malformed_encodings_are_errors() {
        for bad in [
            "",
            "pbkdf2-sha256$1000$abc",
            "$pbkdf2-sha256$i=lots,l=32$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNo",
            "$bcrypt$i=1000,l=32$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNo",
        ] {
            assert!(
                matches!(verify_password("x", bad), Err(GatehouseError::PasswordHash(_))),
                "expected error for {bad:?}"
            );
        }
    }
}
