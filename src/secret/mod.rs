//! Secret module
//!
//! Reads the versioned secret that holds a certificate's exportable
//! PKCS#12 bundle.

pub mod models;
pub mod operations;

pub use models::*;
pub use operations::*;
