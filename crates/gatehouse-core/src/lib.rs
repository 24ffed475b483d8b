pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod password;
pub mod session;
pub mod user;

pub use error::{GatehouseError, Result};
