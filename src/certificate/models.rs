//! Certificate models and data structures

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;
use url::Url;

use crate::error::{KvCertError, Result};

/// `GET /certificates/{name}` response body
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateBundle {
    /// Identifier of the secret holding the exportable key material
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub x5t: Option<String>,
    pub cer: String,
    #[serde(default)]
    pub policy: Option<CertificatePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificatePolicy {
    #[serde(default)]
    pub key_props: Option<KeyProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyProperties {
    #[serde(default)]
    pub exportable: Option<bool>,
}

/// A certificate as read from the vault, before any key material is fetched
#[derive(Debug, Clone)]
pub struct CertificateRecord {
    pub name: String,
    /// Thumbprint as reported by the vault (base64url SHA-1)
    pub x5t: Option<String>,
    /// DER-encoded public certificate
    pub cer: Vec<u8>,
    /// `policy.key_props.exportable`; `None` when the policy omits it
    pub exportable: Option<bool>,
    pub secret_id: Option<Url>,
}

impl CertificateRecord {
    pub fn from_bundle(name: &str, bundle: CertificateBundle) -> Result<Self> {
        let cer = decode_base64(&bundle.cer).map_err(|e| {
            KvCertError::certificate_parse(format!(
                "Certificate '{}' has an invalid 'cer' field: {}",
                name, e
            ))
        })?;

        let secret_id = bundle
            .sid
            .as_deref()
            .filter(|sid| !sid.is_empty())
            .map(Url::parse)
            .transpose()?;

        let exportable = bundle
            .policy
            .as_ref()
            .and_then(|policy| policy.key_props.as_ref())
            .and_then(|props| props.exportable);

        Ok(Self {
            name: name.to_string(),
            x5t: bundle.x5t,
            cer,
            exportable,
            secret_id,
        })
    }

    /// Only an explicit `true` allows fetching the private key
    pub fn is_exportable(&self) -> bool {
        self.exportable == Some(true)
    }
}

/// Decode standard base64, accepting the unpadded base64url form Key Vault uses in some fields
pub fn decode_base64(value: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let trimmed = value.trim();
    STANDARD
        .decode(trimmed)
        .or_else(|_| URL_SAFE_NO_PAD.decode(trimmed.trim_end_matches('=')))
}
