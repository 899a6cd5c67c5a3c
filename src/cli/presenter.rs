//! Certificate summary output

use std::fmt;
use std::io::Write;

use crate::certificate::manager::MaterializedCertificate;
use crate::error::Result;

/// The three fields printed for a retrieved certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    pub subject: String,
    pub thumbprint: String,
    pub has_private_key: bool,
}

impl From<&MaterializedCertificate> for CertificateSummary {
    fn from(materialized: &MaterializedCertificate) -> Self {
        let certificate = materialized.certificate();
        Self {
            subject: certificate.subject().to_string(),
            thumbprint: certificate.thumbprint().to_string(),
            has_private_key: materialized.has_private_key(),
        }
    }
}

/// Capitalized boolean text, `True` or `False`
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for CertificateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "Thumbprint: {}", self.thumbprint)?;
        writeln!(f, "HasPrivateKey: {}", format_bool(self.has_private_key))
    }
}

impl CertificateSummary {
    /// Write the summary in one go so nothing partial reaches the writer on error
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.to_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
