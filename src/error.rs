use thiserror::Error;

/// Main error type for kvcert operations
#[derive(Debug, Error)]
pub enum KvCertError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Certificate not found: {name}")]
    CertificateNotFound { name: String },

    #[error("Secret not found: {name}")]
    SecretNotFound { name: String },

    #[error("Number of segments is incorrect: {segments}, URI: {uri}")]
    InvalidSecretReference { uri: String, segments: usize },

    #[error("Certificate '{name}' is exportable but has no linked secret")]
    MissingSecretReference { name: String },

    #[error("Only PKCS#12 is supported. Found Content-Type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("Certificate parse error: {0}")]
    CertificateParseError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("DNS resolution failed for vault '{vault_name}': {details}")]
    DnsResolutionError { vault_name: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl KvCertError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn certificate_not_found<S: Into<String>>(name: S) -> Self {
        Self::CertificateNotFound { name: name.into() }
    }

    pub fn secret_not_found<S: Into<String>>(name: S) -> Self {
        Self::SecretNotFound { name: name.into() }
    }

    pub fn invalid_secret_reference<S: Into<String>>(uri: S, segments: usize) -> Self {
        Self::InvalidSecretReference {
            uri: uri.into(),
            segments,
        }
    }

    pub fn unsupported_content_type<S: Into<String>>(content_type: S) -> Self {
        Self::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }

    pub fn certificate_parse<S: Into<String>>(msg: S) -> Self {
        Self::CertificateParseError(msg.into())
    }

    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn connection_timeout<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionTimeout(msg.into())
    }

    pub fn dns_resolution<S: Into<String>>(vault_name: S, details: S) -> Self {
        Self::DnsResolutionError {
            vault_name: vault_name.into(),
            details: details.into(),
        }
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}

/// Result type alias for kvcert operations
pub type Result<T> = std::result::Result<T, KvCertError>;
