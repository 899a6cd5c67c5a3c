//! X.509 and PKCS#12 decoding
//!
//! Thumbprints follow the Windows convention: uppercase hex SHA-1 over the
//! DER encoding of the certificate. Subjects list RDNs most specific first
//! (`CN=mycert, O=Contoso, C=US`), the reverse of their encoded order.

use openssl::error::ErrorStack;
use openssl::pkcs12::Pkcs12;
use sha1::{Digest, Sha1};
use tracing::debug;
use x509_parser::parse_x509_certificate;
use x509_parser::x509::X509Name;
use zeroize::Zeroizing;

use crate::error::{KvCertError, Result};

/// A decoded public certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    thumbprint: String,
}

impl Certificate {
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (_, parsed) = parse_x509_certificate(der).map_err(|e| {
            KvCertError::certificate_parse(format!("Invalid X.509 certificate: {}", e))
        })?;

        Ok(Self {
            der: der.to_vec(),
            subject: subject_name(parsed.subject()),
            thumbprint: thumbprint(der),
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

/// Render a distinguished name with its RDNs in reverse encoded order
fn subject_name(name: &X509Name<'_>) -> String {
    let mut rdns: Vec<_> = name.iter_rdn().cloned().collect();
    rdns.reverse();
    X509Name::new(rdns, name.as_raw()).to_string()
}

/// Uppercase hex SHA-1 of the given DER bytes
pub fn thumbprint(der: &[u8]) -> String {
    hex::encode_upper(Sha1::digest(der))
}

/// Contents of a decrypted PKCS#12 archive
pub struct Pkcs12Contents {
    /// DER certificates, the one matching the private key first
    pub certificates: Vec<Vec<u8>>,
    /// PKCS#8 DER private keys
    pub private_keys: Vec<Zeroizing<Vec<u8>>>,
}

/// Parse and decrypt a PKCS#12 archive. Key Vault exports use an empty password.
///
/// OpenSSL reads PBES2 (AES) archives, 3DES archives and unencrypted key bags.
/// Archives whose bags use RC2-40 are unreadable by OpenSSL 3 without its
/// legacy provider, so those are retried with the pure-Rust `p12` decoder.
pub fn parse_pkcs12(blob: &[u8], password: &str) -> Result<Pkcs12Contents> {
    match parse_with_openssl(blob, password) {
        Ok(contents) => Ok(contents),
        Err(error) => {
            debug!(error = %error, "Retrying PKCS#12 archive with the legacy decoder");
            parse_legacy(blob, password).map_err(|legacy| {
                debug!(error = %legacy, "Legacy PKCS#12 decoder failed");
                error
            })
        }
    }
}

fn parse_with_openssl(blob: &[u8], password: &str) -> Result<Pkcs12Contents> {
    let parsed = Pkcs12::from_der(blob)
        .and_then(|pfx| pfx.parse2(password))
        .map_err(|e| openssl_error("Failed to read PKCS#12 archive", e))?;

    let certificates = parsed
        .cert
        .into_iter()
        .chain(parsed.ca.into_iter().flatten())
        .map(|cert| cert.to_der())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| openssl_error("Failed to encode PKCS#12 certificate", e))?;

    let private_keys = parsed
        .pkey
        .map(|key| key.private_key_to_pkcs8())
        .transpose()
        .map_err(|e| openssl_error("Failed to encode PKCS#12 private key", e))?
        .map(Zeroizing::new)
        .into_iter()
        .collect();

    Ok(Pkcs12Contents {
        certificates,
        private_keys,
    })
}

fn parse_legacy(blob: &[u8], password: &str) -> Result<Pkcs12Contents> {
    let pfx = p12::PFX::parse(blob)
        .map_err(|e| KvCertError::certificate_parse(format!("Invalid PKCS#12 data: {:?}", e)))?;

    let certificates = pfx.cert_x509_bags(password).map_err(|e| {
        KvCertError::certificate_parse(format!("Failed to read PKCS#12 certificates: {:?}", e))
    })?;

    let private_keys = pfx
        .key_bags(password)
        .map_err(|e| {
            KvCertError::certificate_parse(format!("Failed to read PKCS#12 private keys: {:?}", e))
        })?
        .into_iter()
        .map(Zeroizing::new)
        .collect();

    Ok(Pkcs12Contents {
        certificates,
        private_keys,
    })
}

fn openssl_error(context: &str, error: ErrorStack) -> KvCertError {
    KvCertError::certificate_parse(format!("{}: {}", context, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::pkey::PKey;
    use openssl::x509::X509;
    use rcgen::{CertificateParams, DnType, KeyPair};

    // Written by the `openssl pkcs12 -export` command line tool
    const FIXTURE_CER: &[u8] = include_bytes!("../../tests/fixtures/mycert.cer");
    const FIXTURE_PBES2: &[u8] = include_bytes!("../../tests/fixtures/mycert-pbes2.pfx");
    const FIXTURE_KEYBAG: &[u8] = include_bytes!("../../tests/fixtures/mycert-keybag.pfx");
    const FIXTURE_LEGACY: &[u8] = include_bytes!("../../tests/fixtures/mycert-legacy.pfx");
    const FIXTURE_NO_KEY: &[u8] = include_bytes!("../../tests/fixtures/mycert-nokey.pfx");

    fn self_signed(common_name: &str) -> (Vec<u8>, Vec<u8>) {
        let mut params = CertificateParams::new(vec![format!("{}.contoso.com", common_name)]).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, common_name);
        let key = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key).unwrap();
        (cert.der().to_vec(), key.serialize_der())
    }

    fn assert_key_matches_fixture(contents: &Pkcs12Contents) {
        assert_eq!(contents.certificates, vec![FIXTURE_CER.to_vec()]);
        assert_eq!(contents.private_keys.len(), 1);

        let key = PKey::private_key_from_pkcs8(&contents.private_keys[0]).unwrap();
        let public = X509::from_der(FIXTURE_CER).unwrap().public_key().unwrap();
        assert!(key.public_eq(&public));
    }

    #[test]
    fn test_certificate_from_der() {
        let (der, _) = self_signed("mycert");
        let cert = Certificate::from_der(&der).unwrap();

        assert_eq!(cert.subject(), "CN=mycert");
        assert_eq!(cert.thumbprint().len(), 40);
        assert_eq!(cert.thumbprint(), cert.thumbprint().to_uppercase());
        assert_eq!(cert.der(), der.as_slice());
    }

    #[test]
    fn test_subject_lists_common_name_first() {
        let mut params = CertificateParams::new(vec!["mycert.contoso.com".to_string()]).unwrap();
        params.distinguished_name.push(DnType::CountryName, "US");
        params
            .distinguished_name
            .push(DnType::OrganizationName, "Contoso");
        params.distinguished_name.push(DnType::CommonName, "mycert");
        let key = KeyPair::generate().unwrap();
        let der = params.self_signed(&key).unwrap().der().to_vec();

        let cert = Certificate::from_der(&der).unwrap();
        assert_eq!(cert.subject(), "CN=mycert, O=Contoso, C=US");
    }

    #[test]
    fn test_fixture_subject_and_thumbprint() {
        let cert = Certificate::from_der(FIXTURE_CER).unwrap();
        assert_eq!(cert.subject(), "CN=mycert, O=Contoso, C=US");
        assert_eq!(cert.thumbprint(), "A287462C0F5AAA7A4791441F1C77DBBBAB3CA013");
    }

    #[test]
    fn test_thumbprint_known_value() {
        // SHA-1 of the empty input
        assert_eq!(thumbprint(b""), "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709");
    }

    #[test]
    fn test_garbage_is_not_a_certificate() {
        let err = Certificate::from_der(&[0x30, 0x03, 0x01, 0x01, 0xff]).unwrap_err();
        assert!(matches!(err, KvCertError::CertificateParseError(_)));
    }

    #[test]
    fn test_parse_pkcs12_pbes2() {
        assert_key_matches_fixture(&parse_pkcs12(FIXTURE_PBES2, "").unwrap());
    }

    #[test]
    fn test_parse_pkcs12_unencrypted_key_bag() {
        assert_key_matches_fixture(&parse_pkcs12(FIXTURE_KEYBAG, "").unwrap());
    }

    #[test]
    fn test_parse_pkcs12_rc2_and_triple_des() {
        assert_key_matches_fixture(&parse_pkcs12(FIXTURE_LEGACY, "").unwrap());
    }

    #[test]
    fn test_parse_pkcs12_without_key() {
        let contents = parse_pkcs12(FIXTURE_NO_KEY, "").unwrap();
        assert_eq!(contents.certificates, vec![FIXTURE_CER.to_vec()]);
        assert!(contents.private_keys.is_empty());
    }

    #[test]
    fn test_parse_pkcs12_from_pure_rust_encoder() {
        let (der, key) = self_signed("mycert");
        let pfx = p12::PFX::new(&der, &key, None, "", "mycert").unwrap().to_der();

        let contents = parse_pkcs12(&pfx, "").unwrap();
        assert_eq!(contents.certificates, vec![der]);
        assert_eq!(contents.private_keys.len(), 1);
        assert!(PKey::private_key_from_pkcs8(&contents.private_keys[0]).is_ok());
    }

    #[test]
    fn test_parse_pkcs12_rejects_garbage() {
        assert!(matches!(
            parse_pkcs12(b"not a pfx", ""),
            Err(KvCertError::CertificateParseError(_))
        ));
    }

    #[test]
    fn test_parse_pkcs12_rejects_wrong_password() {
        assert!(matches!(
            parse_pkcs12(FIXTURE_PBES2, "not-the-password"),
            Err(KvCertError::CertificateParseError(_))
        ));
    }
}
