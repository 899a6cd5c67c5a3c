//! Authentication module for Azure services
//!
//! Supplies bearer tokens for the Key Vault certificate and secret clients.

pub mod provider;

pub use provider::*;
