//! Vault access module
//!
//! Address resolution for the target vault and the authenticated REST
//! client shared by certificate and secret operations.

pub mod address;
pub mod client;

pub use address::*;
pub use client::*;
