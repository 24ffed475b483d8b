use crate::error::{GatehouseError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_USERNAME_LEN: usize = 32;
pub const MAX_PASSWORD_BYTES: usize = 1024;

// ---------------------------------------------------------------------------
// Username validation
// ---------------------------------------------------------------------------

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_re() -> &'static Regex {
    USERNAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap())
}

pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty()
        || username.len() > MAX_USERNAME_LEN
        || !username_re().is_match(username)
    {
        return Err(GatehouseError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Password validation
// ---------------------------------------------------------------------------

pub fn validate_password(password: &str, min_length: usize) -> Result<()> {
    if password.chars().count() < min_length {
        return Err(GatehouseError::InvalidPassword(format!(
            "must be at least {min_length} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(GatehouseError::InvalidPassword(format!(
            "must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
