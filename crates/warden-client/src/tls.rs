//! Transport security for client connections.

use std::fs;
use std::path::Path;
use tonic::transport::{Certificate, ClientTlsConfig, Endpoint};
use tracing::{debug, info};
use warden_core::{WardenError, WardenResult};

const PEM_CERTIFICATE_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// Transport-level security of a connection: TLS or plaintext.
#[derive(Debug, Clone)]
pub struct TransportCredentials {
    tls: Option<ClientTlsConfig>,
}

impl TransportCredentials {
    /// Resolves transport security for `domain`.
    ///
    /// With TLS enabled the server is verified against the PEM bundle at
    /// `ca_cert_path`, or the native root store when no bundle is given.
    pub fn new(domain: &str, tls: bool, ca_cert_path: Option<&Path>) -> WardenResult<Self> {
        if !tls {
            debug!("Transport security disabled for {}", domain);
            return Ok(Self::insecure());
        }

        let config = ClientTlsConfig::new().domain_name(domain);
        let config = match ca_cert_path {
            Some(path) => {
                let pem = read_certificate_bundle(path)?;
                info!("Client TLS configured with CA bundle {}", path.display());
                config.ca_certificate(Certificate::from_pem(pem))
            }
            None => {
                debug!("Client TLS configured with native roots");
                config.with_native_roots()
            }
        };

        Ok(Self { tls: Some(config) })
    }

    /// Plaintext transport.
    pub const fn insecure() -> Self {
        Self { tls: None }
    }

    pub const fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    pub const fn tls_config(&self) -> Option<&ClientTlsConfig> {
        self.tls.as_ref()
    }

    pub(crate) fn apply(&self, endpoint: Endpoint) -> WardenResult<Endpoint> {
        match &self.tls {
            Some(config) => Ok(endpoint.tls_config(config.clone())?),
            None => Ok(endpoint),
        }
    }
}

/// Reads a PEM bundle and checks that it holds at least one certificate.
fn read_certificate_bundle(path: &Path) -> WardenResult<Vec<u8>> {
    let pem = fs::read(path).map_err(|e| {
        WardenError::Configuration(format!(
            "Failed to read CA certificate from '{}': {}",
            path.display(),
            e
        ))
    })?;

    if !String::from_utf8_lossy(&pem).contains(PEM_CERTIFICATE_MARKER) {
        return Err(WardenError::Configuration(format!(
            "No PEM certificate found in '{}'",
            path.display()
        )));
    }

    Ok(pem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Test certificate (self-signed, for testing only)
    const TEST_CERT: &str = r#"-----BEGIN CERTIFICATE-----
MIIBkTCB+wIJAKHBfpegFjJgMA0GCSqGSIb3DQEBCwUAMBExDzANBgNVBAMMBnVu
dXNlZDAeFw0yMzAxMDEwMDAwMDBaFw0yNDAxMDEwMDAwMDBaMBExDzANBgNVBAMM
BnVudXNlZDBcMA0GCSqGSIb3DQEBAQUAA0sAMEgCQQC7o96FCFxHQ1rMGK7HrbkL
FJbNhVDGMnXUXaDthEF78+hg+bFnYH/s8HgFxFm/sDnBKiPP0y8O8E9bBOYzWY5d
AgMBAAGjUzBRMB0GA1UdDgQWBBRrT/K4C/NvJJEQs7W5VJvM1PZqpzAfBgNVHSME
GDAWgBRrT/K4C/NvJJEQs7W5VJvM1PZqpzAPBgNVHRMBAf8EBTADAQH/MA0GCSqG
SIb3DQEBCwUAA0EAV8/K1dKcMNwKEgH9tJnzGKSmjDCFPxJFdwFhpfTq3mGf0tMY
HKbT0LKsLK3KM8j5PDPj0g9Y5EqbZMXF0N5bPQ==
-----END CERTIFICATE-----"#;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_insecure() {
        let credentials = TransportCredentials::new("localhost", false, None).unwrap();
        assert!(!credentials.is_tls());
        assert!(credentials.tls_config().is_none());
    }

    #[test]
    fn test_insecure_ignores_ca_path() {
        let credentials =
            TransportCredentials::new("localhost", false, Some(Path::new("/nonexistent/ca.pem"))).unwrap();
        assert!(!credentials.is_tls());
    }

    #[test]
    fn test_tls_with_native_roots() {
        let credentials = TransportCredentials::new("example.com", true, None).unwrap();
        assert!(credentials.is_tls());
    }

    #[test]
    fn test_tls_with_ca_bundle() {
        let cert_file = create_temp_file(TEST_CERT);
        let credentials = TransportCredentials::new("example.com", true, Some(cert_file.path())).unwrap();
        assert!(credentials.is_tls());
    }

    #[test]
    fn test_missing_ca_bundle() {
        let result = TransportCredentials::new("example.com", true, Some(Path::new("/nonexistent/ca.pem")));
        assert!(matches!(result, Err(WardenError::Configuration(_))));
    }

    #[test]
    fn test_invalid_ca_bundle() {
        let file = create_temp_file("not a certificate");
        let result = TransportCredentials::new("example.com", true, Some(file.path()));
        assert!(matches!(result, Err(WardenError::Configuration(_))));
    }

    #[test]
    fn test_apply_tls_to_endpoint() {
        let credentials = TransportCredentials::new("example.com", true, None).unwrap();
        let endpoint = Endpoint::from_static("https://example.com:443");
        assert!(credentials.apply(endpoint).is_ok());
    }
}
