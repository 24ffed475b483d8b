use crate::config::env_var;
use crate::error::{GatehouseError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted signing key, in bytes.
pub const MIN_KEY_LEN: usize = 32;

/// Length of keys produced by [`Crypto::generate_key`].
pub const GENERATED_KEY_LEN: usize = 64;

/// Holds the server secret used to sign session cookies.
pub struct Crypto {
    key: Vec<u8>,
}

impl std::fmt::Debug for Crypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crypto")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .finish()
    }
}

impl Crypto {
    pub fn new(key: Vec<u8>) -> Result<Self> {
        if key.len() < MIN_KEY_LEN {
            return Err(GatehouseError::InvalidKey(format!(
                "key is {} bytes, need at least {MIN_KEY_LEN}",
                key.len()
            )));
        }
        Ok(Self { key })
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| GatehouseError::InvalidKey(format!("not valid base64: {e}")))?;
        Self::new(key)
    }

    /// Read the key from `SESSION_KEY` (standard base64).
    pub fn from_env() -> Result<Self> {
        Self::from_base64(&env_var("SESSION_KEY")?)
    }

    /// Produce a fresh random key, base64 encoded, suitable for `SESSION_KEY`.
    pub fn generate_key() -> String {
        let mut key = [0u8; GENERATED_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        STANDARD.encode(key)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("infallible: HMAC accepts keys of any length")
    }

    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Constant-time tag check.
    pub fn verify(&self, payload: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(payload);
        mac.verify_slice(tag).is_ok()
    }
}
