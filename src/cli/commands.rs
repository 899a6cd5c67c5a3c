//! CLI arguments and the certificate lookup procedure

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use crate::auth::provider::{AzureAuthProvider, DefaultAzureCredentialProvider};
use crate::certificate::manager::CertificateManager;
use crate::certificate::operations::AzureCertificateOperations;
use crate::cli::presenter::CertificateSummary;
use crate::config::Config;
use crate::error::Result;
use crate::secret::operations::AzureSecretOperations;
use crate::vault::address::resolve_vault_url;
use crate::vault::client::VaultClient;

/// Get the full version string with build information
fn get_version() -> &'static str {
    env!("VERSION_WITH_GIT")
}

#[derive(Debug, Parser)]
#[command(name = "kvcert")]
#[command(about = "Gets information about a certificate in Azure Key Vault")]
#[command(version = get_version())]
#[command(long_version = concat!(env!("VERSION_WITH_GIT"), " (built ", env!("BUILD_TIME"), ")"))]
pub struct Cli {
    /// The name of the certificate
    #[arg(value_name = "CERTIFICATE_NAME")]
    pub certificate_name: String,

    /// Vault name or URI (defaults to $AZURE_KEYVAULT_URL)
    #[arg(short = 'v', long, value_name = "VAULT")]
    pub vault: Option<String>,

    /// Log HTTP and authentication diagnostics to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the vault, fetch the certificate and print its summary
    pub async fn execute(self, config: Config, cancel: CancellationToken) -> Result<()> {
        let vault_url = resolve_vault_url(self.vault.as_deref(), config.vault_url.as_deref())?;
        let auth_provider: Arc<dyn AzureAuthProvider> =
            Arc::new(DefaultAzureCredentialProvider::new()?);

        let summary = fetch_certificate_summary(
            vault_url,
            &self.certificate_name,
            &config,
            auth_provider,
            &cancel,
        )
        .await?;

        summary.write_to(&mut std::io::stdout().lock())
    }
}

/// Fetch a certificate (and its exportable key) from the vault and summarize it
pub async fn fetch_certificate_summary(
    vault_url: Url,
    certificate_name: &str,
    config: &Config,
    auth_provider: Arc<dyn AzureAuthProvider>,
    cancel: &CancellationToken,
) -> Result<CertificateSummary> {
    info!(vault = %vault_url, certificate = %certificate_name, "Getting certificate");

    let client = Arc::new(VaultClient::new(vault_url, config, auth_provider)?);
    let manager = CertificateManager::new(
        Arc::new(AzureCertificateOperations::new(client.clone())),
        Arc::new(AzureSecretOperations::new(client)),
    );

    let materialized = manager.get_certificate(certificate_name, cancel).await?;
    Ok(CertificateSummary::from(&materialized))
}
