//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use azure_core::auth::AccessToken;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kvcert::auth::{AzureAuthProvider, StaticTokenProvider};
use rcgen::{CertificateParams, DnType, KeyPair};
use serde_json::{json, Value};
use time::OffsetDateTime;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

const FIXTURE_CER: &[u8] = include_bytes!("../fixtures/mycert.cer");

/// PKCS#12 encodings of `fixtures/mycert.cer` written by `openssl pkcs12 -export`
#[derive(Debug, Clone, Copy)]
pub enum OpensslPfx {
    /// OpenSSL 3 default: PBES2 with AES-256-CBC
    Pbes2,
    /// `-keypbe NONE -certpbe NONE`: plain key bag
    KeyBag,
    /// `-legacy`: RC2-40 certificate bag and 3DES key bag
    Legacy,
    /// `-nokeys`
    NoKey,
}

impl OpensslPfx {
    fn bytes(self) -> &'static [u8] {
        match self {
            Self::Pbes2 => include_bytes!("../fixtures/mycert-pbes2.pfx"),
            Self::KeyBag => include_bytes!("../fixtures/mycert-keybag.pfx"),
            Self::Legacy => include_bytes!("../fixtures/mycert-legacy.pfx"),
            Self::NoKey => include_bytes!("../fixtures/mycert-nokey.pfx"),
        }
    }
}

/// A certificate with its PKCS#12 archive, in the shapes Key Vault returns
pub struct CertificateFixture {
    pub cer: Vec<u8>,
    pub pfx: Vec<u8>,
}

impl CertificateFixture {
    /// The `CN=mycert, O=Contoso, C=US` certificate from `tests/fixtures`
    pub fn openssl(pfx: OpensslPfx) -> Self {
        Self {
            cer: FIXTURE_CER.to_vec(),
            pfx: pfx.bytes().to_vec(),
        }
    }

    /// A fresh self-signed certificate packaged by the `p12` crate
    pub fn new(common_name: &str) -> Self {
        let mut params =
            CertificateParams::new(vec![format!("{}.contoso.com", common_name)]).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, common_name);
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();

        let cer = cert.der().to_vec();
        let key = key_pair.serialize_der();
        let pfx = p12::PFX::new(&cer, &key, None, "", common_name)
            .unwrap()
            .to_der();

        Self { cer, pfx }
    }

    pub fn cer_base64(&self) -> String {
        STANDARD.encode(&self.cer)
    }

    pub fn pfx_base64(&self) -> String {
        STANDARD.encode(&self.pfx)
    }

    /// Key Vault certificate response body
    pub fn certificate_body(&self, vault: &str, name: &str, exportable: Option<bool>, sid_path: &str) -> Value {
        let mut body = json!({
            "id": format!("{}/certificates/{}/abc123", vault, name),
            "sid": format!("{}{}", vault, sid_path),
            "cer": self.cer_base64(),
            "attributes": {"enabled": true},
        });
        if let Some(exportable) = exportable {
            body["policy"] = json!({
                "key_props": {"exportable": exportable, "kty": "EC"},
                "secret_props": {"contentType": "application/x-pkcs12"}
            });
        }
        body
    }
}

pub fn static_token_provider() -> Arc<dyn AzureAuthProvider> {
    let token = AccessToken::new(
        TEST_TOKEN.to_string(),
        OffsetDateTime::now_utc() + time::Duration::hours(1),
    );
    Arc::new(StaticTokenProvider::new(token))
}

/// Mock `GET /certificates/{name}` with the given body
pub async fn mount_certificate(server: &MockServer, name: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/certificates/{}", name)))
        .and(query_param("api-version", "7.4"))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mock `GET /secrets/{name}/{version}` returning the given content type and value
pub async fn mount_secret(
    server: &MockServer,
    name: &str,
    version: &str,
    content_type: &str,
    value: &str,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/secrets/{}/{}", name, version)))
        .and(query_param("api-version", "7.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": format!("{}/secrets/{}/{}", server.uri(), name, version),
            "value": value,
            "contentType": content_type,
            "managed": true,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}
