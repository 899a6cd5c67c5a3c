//! Secret retrieval
//!
//! Only the versioned read needed to pull a certificate's exportable key.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::models::{SecretBundle, SecretRecord};
use crate::error::{KvCertError, Result};
use crate::vault::client::VaultClient;

/// Trait for secret operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretService: Send + Sync {
    /// Get a specific version of a secret
    async fn get_secret(
        &self,
        name: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> Result<SecretRecord>;
}

/// Azure Key Vault secret operations implementation
pub struct AzureSecretOperations {
    client: Arc<VaultClient>,
}

impl AzureSecretOperations {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretService for AzureSecretOperations {
    async fn get_secret(
        &self,
        name: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> Result<SecretRecord> {
        debug!(secret = %name, version = %version, "Fetching secret");

        let bundle: SecretBundle = self
            .client
            .get_json(&["secrets", name, version], cancel, || {
                KvCertError::secret_not_found(format!("{}/{}", name, version))
            })
            .await?;

        Ok(bundle.into())
    }
}
