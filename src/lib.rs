//! kvcert - Azure Key Vault certificate lookup
//!
//! Retrieves a certificate from Azure Key Vault, pulls its private key from
//! the linked PKCS#12 secret when the policy allows export, and summarizes
//! the result.

pub mod auth;
pub mod certificate;
pub mod cli;
pub mod config;
pub mod error;
pub mod secret;
pub mod utils;
pub mod vault;

// Re-export commonly used types
pub use error::{KvCertError, Result};
