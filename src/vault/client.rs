//! Key Vault data-plane REST client
//!
//! Shared by the certificate and secret operations. Every request carries a
//! bearer token for the Key Vault scope and races the caller's cancellation
//! token.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::auth::provider::{AzureAuthProvider, KEY_VAULT_SCOPE};
use crate::config::Config;
use crate::error::{KvCertError, Result};
use crate::utils::network::{classify_network_error, create_http_client};

/// Error envelope returned by the Key Vault REST API
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Non-success response from the vault
#[derive(Debug)]
pub struct VaultApiError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
}

impl VaultApiError {
    fn from_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                status,
                code: envelope.error.code,
                message: envelope.error.message.unwrap_or_default(),
            },
            Err(_) => Self {
                status,
                code: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// Convert to the crate error, using `not_found` for 404 responses
    pub fn into_error(self, not_found: impl FnOnce() -> KvCertError) -> KvCertError {
        let detail = match &self.code {
            Some(code) => format!("HTTP {} ({}) - {}", self.status, code, self.message),
            None => format!("HTTP {} - {}", self.status, self.message),
        };

        match self.status {
            StatusCode::NOT_FOUND => not_found(),
            StatusCode::UNAUTHORIZED => KvCertError::authentication(detail),
            StatusCode::FORBIDDEN => KvCertError::permission_denied(detail),
            _ => KvCertError::azure_api(detail),
        }
    }
}

pub struct VaultClient {
    vault_url: Url,
    api_version: String,
    http_client: Client,
    auth_provider: Arc<dyn AzureAuthProvider>,
}

impl VaultClient {
    pub fn new(vault_url: Url, config: &Config, auth_provider: Arc<dyn AzureAuthProvider>) -> Result<Self> {
        let http_client = create_http_client(&config.network)?;
        Ok(Self {
            vault_url,
            api_version: config.api_version.clone(),
            http_client,
            auth_provider,
        })
    }

    /// Client with default configuration, mainly for tests against a local server
    pub fn with_defaults(vault_url: Url, auth_provider: Arc<dyn AzureAuthProvider>) -> Result<Self> {
        Self::new(vault_url, &Config::default(), auth_provider)
    }

    pub fn vault_url(&self) -> &Url {
        &self.vault_url
    }

    /// Build `{vault}/{segments...}?api-version=...`, escaping each segment
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.vault_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                KvCertError::invalid_argument(format!(
                    "{} cannot be used as a vault base URI",
                    self.vault_url
                ))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Authenticated GET, aborted when `cancel` fires
    ///
    /// A 404 is reported through `not_found` so each caller names its own resource.
    pub async fn get_json<T, F>(
        &self,
        segments: &[&str],
        cancel: &CancellationToken,
        not_found: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> KvCertError,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Request cancelled");
                Err(KvCertError::Cancelled)
            }
            result = self.send_get(segments, not_found) => result,
        }
    }

    async fn send_get<T, F>(&self, segments: &[&str], not_found: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> KvCertError,
    {
        let url = self.endpoint(segments)?;
        let token = self.auth_provider.get_token(&[KEY_VAULT_SCOPE]).await?;

        debug!(method = "GET", url = %url, "Sending Key Vault request");

        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(token.token.secret())
            .send()
            .await
            .map_err(|e| classify_network_error(&e, url.as_str()))?;

        let status = response.status();
        debug!(url = %url, status = %status, "Received Key Vault response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultApiError::from_body(status, &body).into_error(not_found));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| classify_network_error(&e, url.as_str()))
    }
}
