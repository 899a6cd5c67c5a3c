//! Authentication provider trait and implementations
//!
//! The vault clients only need bearer tokens; how they are obtained is left
//! to `DefaultAzureCredential` (environment, managed identity, Azure CLI).

use async_trait::async_trait;
use azure_core::auth::{AccessToken, TokenCredential};
use azure_identity::{DefaultAzureCredential, TokenCredentialOptions};
use std::sync::Arc;
use tracing::debug;

use crate::error::{KvCertError, Result};

/// OAuth scope for the Key Vault data plane
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Trait for Azure authentication providers
#[async_trait]
pub trait AzureAuthProvider: Send + Sync {
    /// Get an access token for the specified scopes
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;
}

/// Default Azure Credential Provider using DefaultAzureCredential
pub struct DefaultAzureCredentialProvider {
    credential: Arc<DefaultAzureCredential>,
}

impl DefaultAzureCredentialProvider {
    /// Create a new DefaultAzureCredentialProvider
    pub fn new() -> Result<Self> {
        let credential = Arc::new(
            DefaultAzureCredential::create(TokenCredentialOptions::default()).map_err(|e| {
                KvCertError::authentication(format!(
                    "Failed to create DefaultAzureCredential: {}",
                    e
                ))
            })?,
        );

        Ok(Self { credential })
    }
}

#[async_trait]
impl AzureAuthProvider for DefaultAzureCredentialProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        debug!(?scopes, "Requesting access token");

        let token_response = self
            .credential
            .get_token(scopes)
            .await
            .map_err(|e| KvCertError::authentication(format!("Failed to get token: {}", e)))?;

        Ok(token_response)
    }
}

/// Provider that hands out a fixed token, for emulators and tests
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AzureAuthProvider for StaticTokenProvider {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        Ok(self.token.clone())
    }
}
