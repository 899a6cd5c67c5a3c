//! Certificate materialization
//!
//! Combines the certificate record with, when the policy allows export,
//! the PKCS#12 secret that carries its private key.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::models::{decode_base64, CertificateRecord};
use super::operations::CertificateService;
use super::x509::{parse_pkcs12, Certificate};
use crate::error::{KvCertError, Result};
use crate::secret::models::SecretReference;
use crate::secret::operations::SecretService;

/// A certificate with or without its private key
pub enum MaterializedCertificate {
    CertificateOnly(Certificate),
    WithPrivateKey {
        certificate: Certificate,
        /// PKCS#8 DER
        private_key: Zeroizing<Vec<u8>>,
    },
}

impl MaterializedCertificate {
    pub fn certificate(&self) -> &Certificate {
        match self {
            Self::CertificateOnly(certificate) => certificate,
            Self::WithPrivateKey { certificate, .. } => certificate,
        }
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self, Self::WithPrivateKey { .. })
    }
}

impl std::fmt::Debug for MaterializedCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CertificateOnly(certificate) => {
                f.debug_tuple("CertificateOnly").field(certificate).finish()
            }
            Self::WithPrivateKey { certificate, .. } => f
                .debug_struct("WithPrivateKey")
                .field("certificate", certificate)
                .field("private_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Build the certificate, fetching the private key only when the policy marks it exportable
pub async fn materialize(
    record: &CertificateRecord,
    secrets: &dyn SecretService,
    cancel: &CancellationToken,
) -> Result<MaterializedCertificate> {
    if !record.is_exportable() {
        debug!(certificate = %record.name, exportable = ?record.exportable, "Private key not exportable");
        return Ok(MaterializedCertificate::CertificateOnly(Certificate::from_der(
            &record.cer,
        )?));
    }

    let secret_id = record
        .secret_id
        .as_ref()
        .ok_or_else(|| KvCertError::MissingSecretReference {
            name: record.name.clone(),
        })?;
    let reference = SecretReference::parse(secret_id)?;

    let secret = secrets
        .get_secret(&reference.name, &reference.version, cancel)
        .await?;

    if !secret.is_pkcs12() {
        // PEM secrets would need the base64 body extracted from the armor
        return Err(KvCertError::unsupported_content_type(
            secret.content_type.as_deref().unwrap_or("<none>"),
        ));
    }

    let blob = Zeroizing::new(STANDARD.decode(secret.value.trim())?);
    let mut contents = parse_pkcs12(&blob, "")?;

    if contents.certificates.is_empty() {
        return Err(KvCertError::certificate_parse(
            "PKCS#12 archive contains no certificate",
        ));
    }

    // Prefer the bag matching the vault's public certificate; chains may come in any order
    let leaf_index = contents
        .certificates
        .iter()
        .position(|der| der.as_slice() == record.cer.as_slice())
        .unwrap_or(0);
    let certificate = Certificate::from_der(&contents.certificates[leaf_index])?;

    // An exportable certificate must come with its key
    if contents.private_keys.is_empty() {
        return Err(KvCertError::certificate_parse(format!(
            "PKCS#12 secret for certificate '{}' contains no private key",
            record.name
        )));
    }
    let private_key = contents.private_keys.swap_remove(0);

    Ok(MaterializedCertificate::WithPrivateKey {
        certificate,
        private_key,
    })
}

/// High-level certificate manager
pub struct CertificateManager {
    certificates: Arc<dyn CertificateService>,
    secrets: Arc<dyn SecretService>,
}

impl CertificateManager {
    pub fn new(certificates: Arc<dyn CertificateService>, secrets: Arc<dyn SecretService>) -> Self {
        Self {
            certificates,
            secrets,
        }
    }

    /// Fetch a certificate and, when exportable, its private key
    pub async fn get_certificate(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<MaterializedCertificate> {
        let record = self.certificates.get_certificate(name, cancel).await?;
        let materialized = materialize(&record, self.secrets.as_ref(), cancel).await?;

        if let Some(reported) = record.x5t.as_deref().and_then(|x5t| decode_base64(x5t).ok()) {
            let reported = hex::encode_upper(reported);
            if reported != materialized.certificate().thumbprint() {
                warn!(
                    certificate = %name,
                    reported = %reported,
                    computed = %materialized.certificate().thumbprint(),
                    "Vault thumbprint does not match the retrieved certificate"
                );
            }
        }

        info!(
            certificate = %name,
            thumbprint = %materialized.certificate().thumbprint(),
            has_private_key = materialized.has_private_key(),
            "Retrieved certificate"
        );

        Ok(materialized)
    }
}
