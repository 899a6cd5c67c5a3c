//! Certificate retrieval

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::models::{CertificateBundle, CertificateRecord};
use crate::error::{KvCertError, Result};
use crate::vault::client::VaultClient;

/// Trait for certificate operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateService: Send + Sync {
    /// Get the latest version of a certificate together with its policy
    async fn get_certificate(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<CertificateRecord>;
}

/// Azure Key Vault certificate operations implementation
pub struct AzureCertificateOperations {
    client: Arc<VaultClient>,
}

impl AzureCertificateOperations {
    pub fn new(client: Arc<VaultClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CertificateService for AzureCertificateOperations {
    async fn get_certificate(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<CertificateRecord> {
        debug!(certificate = %name, vault = %self.client.vault_url(), "Fetching certificate");

        let bundle: CertificateBundle = self
            .client
            .get_json(&["certificates", name], cancel, || {
                KvCertError::certificate_not_found(name)
            })
            .await?;

        CertificateRecord::from_bundle(name, bundle)
    }
}
