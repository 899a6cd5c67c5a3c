//! Certificate module
//!
//! Reads certificates from Key Vault and turns them into decoded
//! certificates, with the private key when the policy allows export.

pub mod manager;
pub mod models;
pub mod operations;
pub mod x509;

pub use manager::*;
pub use models::*;
pub use operations::*;
pub use x509::*;
