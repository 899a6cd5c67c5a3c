//! Secret models and data structures
//!
//! Wire model for the Key Vault "get secret" response, the in-memory
//! secret record, and the versioned secret reference linked from a
//! certificate.

use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::error::{KvCertError, Result};

/// Content type Key Vault uses for PKCS#12-backed certificate secrets
pub const PKCS12_CONTENT_TYPE: &str = "application/x-pkcs12";

/// Content type Key Vault uses for PEM-backed certificate secrets
pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// `GET /secrets/{name}/{version}` response body
#[derive(Debug, Clone, Deserialize)]
pub struct SecretBundle {
    pub value: String,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

/// A secret fetched from the vault
pub struct SecretRecord {
    pub content_type: Option<String>,
    pub value: Zeroizing<String>,
}

impl SecretRecord {
    pub fn new(content_type: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            value: Zeroizing::new(value.into()),
        }
    }

    /// Whether the payload is a base64 PKCS#12 blob (content type compared ignoring case)
    pub fn is_pkcs12(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().eq_ignore_ascii_case(PKCS12_CONTENT_TYPE))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("content_type", &self.content_type)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl From<SecretBundle> for SecretRecord {
    fn from(bundle: SecretBundle) -> Self {
        Self {
            content_type: bundle.content_type,
            value: Zeroizing::new(bundle.value),
        }
    }
}

/// Versioned secret linked from a certificate (`/secrets/{name}/{version}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    pub name: String,
    pub version: String,
}

impl SecretReference {
    /// Parse a secret identifier. The path must hold exactly three non-empty segments.
    pub fn parse(secret_id: &Url) -> Result<Self> {
        let segments: Vec<&str> = secret_id
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.len() != 3 {
            return Err(KvCertError::invalid_secret_reference(
                secret_id.as_str(),
                segments.len(),
            ));
        }

        Ok(Self {
            name: segments[1].to_string(),
            version: segments[2].to_string(),
        })
    }
}
