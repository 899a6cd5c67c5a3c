//! Vault address resolution
//!
//! Turns a `--vault` argument or the `AZURE_KEYVAULT_URL` fallback into an
//! absolute vault URI. Either source may be a full URI or a bare vault name.

use tracing::debug;
use url::Url;

use crate::error::{KvCertError, Result};

/// Build the public-cloud vault URI for a bare vault name
pub fn get_vault_uri(vault_name: &str) -> String {
    format!("https://{}.vault.azure.net", vault_name)
}

/// Interpret a single candidate as an absolute URI or a vault short name
pub fn parse_vault_address(value: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(value) {
        if url.has_host() {
            return Some(url);
        }
    }

    // A short name must expand into a URI whose host is exactly that name
    let expanded = Url::parse(&get_vault_uri(value)).ok()?;
    let expected_host = format!("{}.vault.azure.net", value.to_ascii_lowercase());
    match expanded.host_str() {
        Some(host) if host == expected_host && expanded.path() == "/" => Some(expanded),
        _ => None,
    }
}

/// Resolve the vault URI from an explicit value with an environment fallback
///
/// Empty values count as absent. When a value is present but unusable the
/// error names the last value tried.
pub fn resolve_vault_url(explicit: Option<&str>, fallback: Option<&str>) -> Result<Url> {
    let candidates = [explicit, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();

    let Some(last) = candidates.last() else {
        return Err(KvCertError::config(
            "Missing --vault parameter or $AZURE_KEYVAULT_URL",
        ));
    };

    for candidate in &candidates {
        if let Some(url) = parse_vault_address(candidate) {
            debug!(vault = %url, "Resolved vault address");
            return Ok(url);
        }
        debug!(candidate = %candidate, "Ignoring unusable vault address");
    }

    Err(KvCertError::config(format!(
        "{} is not a valid Azure Key Vault URI",
        last
    )))
}
