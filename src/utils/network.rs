use crate::error::{KvCertError, Result};
use reqwest::Client;
use std::time::Duration;

/// Configuration for HTTP client with proper timeouts and user-friendly error handling
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("kvcert/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a properly configured HTTP client with timeouts
pub fn create_http_client(config: &NetworkConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| KvCertError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Enhanced network error classification and user-friendly error messages
pub fn classify_network_error(error: &reqwest::Error, url: &str) -> KvCertError {
    let vault_name = extract_vault_name_from_url(url);

    if error.is_timeout() {
        return KvCertError::connection_timeout(format!(
            "Connection to Azure Key Vault '{}' timed out. This might be due to network issues or the vault being unreachable.",
            vault_name
        ));
    }

    if error.is_connect() {
        if is_dns_resolution_error(error) {
            return KvCertError::dns_resolution(
                vault_name.clone(),
                format!("Unable to resolve vault hostname. Please check if the vault name '{}' is correct and the vault exists.", vault_name)
            );
        }

        return KvCertError::network(format!(
            "Failed to connect to Azure Key Vault '{}'. Please check your network connection and verify the vault name.",
            vault_name
        ));
    }

    if error.is_decode() {
        return KvCertError::serialization(format!(
            "Unexpected response body from vault '{}': {}",
            vault_name, error
        ));
    }

    KvCertError::network(format!(
        "Network error when accessing vault '{}': {}",
        vault_name, error
    ))
}

fn is_dns_resolution_error(error: &reqwest::Error) -> bool {
    // reqwest hides the io error kind behind its own wrapper, so match on the chain text
    let mut messages = vec![error.to_string().to_lowercase()];
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        messages.push(inner.to_string().to_lowercase());
        source = inner.source();
    }

    let dns_indicators = [
        "dns",
        "name resolution",
        "failed to lookup address",
        "name or service not known",
        "nodename nor servname provided",
        "no such host",
        "getaddrinfo failed",
    ];

    messages.iter().any(|msg| {
        dns_indicators
            .iter()
            .any(|indicator| msg.contains(indicator))
    })
}

/// Extract vault name from Azure Key Vault URL
pub fn extract_vault_name_from_url(url: &str) -> String {
    if let Ok(parsed_url) = url::Url::parse(url) {
        if let Some(host) = parsed_url.host_str() {
            if let Some(name) = host.strip_suffix(".vault.azure.net") {
                return name.to_string();
            }
            return host.to_string();
        }
    }

    "unknown-vault".to_string()
}
