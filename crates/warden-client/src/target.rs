//! Address of a platform instance.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Host;
use warden_config::{authority, origin as format_origin, ClientSettings, DEFAULT_PLAINTEXT_PORT, DEFAULT_TLS_PORT};
use warden_core::WardenError;

/// The platform instance a client connects to.
///
/// Immutable once built; connection setup only borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    domain: String,
    port: u16,
    tls: bool,
    ca_cert_path: Option<PathBuf>,
}

impl Target {
    /// Creates a TLS target on port 443.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            port: DEFAULT_TLS_PORT,
            tls: true,
            ca_cert_path: None,
        }
    }

    /// Uses a custom port, keeping the current TLS setting.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Switches to a plaintext connection on the given port.
    #[must_use]
    pub fn with_insecure(mut self, port: u16) -> Self {
        self.tls = false;
        self.port = port;
        self
    }

    /// Trusts the PEM bundle at `path` instead of the native root store.
    #[must_use]
    pub fn with_ca_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }

    /// Builds a target from loaded settings.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut target = Self::new(settings.domain.clone());
        target = if settings.insecure {
            target.with_insecure(settings.port.unwrap_or(DEFAULT_PLAINTEXT_PORT))
        } else {
            target.with_port(settings.effective_port())
        };
        match &settings.ca_cert_path {
            Some(path) => target.with_ca_certificate(path),
            None => target,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub const fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn ca_cert_path(&self) -> Option<&Path> {
        self.ca_cert_path.as_deref()
    }

    /// Returns `domain:port`, with IPv6 addresses in brackets.
    pub fn host(&self) -> String {
        authority(&self.domain, self.port)
    }

    /// Returns the externally visible origin, omitting the scheme's default port.
    pub fn origin(&self) -> String {
        format_origin(self.tls, &self.domain, self.port)
    }

    /// Returns the URI the transport dials.
    pub fn uri(&self) -> String {
        format!("{}://{}", self.scheme(), self.host())
    }

    const fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }
}

/// Parses an origin such as `https://auth.example.com` or `http://localhost:8080`.
impl FromStr for Target {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = url::Url::parse(s)
            .map_err(|e| WardenError::Configuration(format!("Invalid target '{}': {}", s, e)))?;

        // IPv6 hosts are kept without brackets so they work as TLS server names
        let domain = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(WardenError::Configuration(format!("Target '{}' has no host", s))),
        };

        match url.scheme() {
            "https" => Ok(Self::new(domain).with_port(url.port().unwrap_or(DEFAULT_TLS_PORT))),
            "http" => Ok(Self::new(domain).with_insecure(url.port().unwrap_or(DEFAULT_PLAINTEXT_PORT))),
            other => Err(WardenError::Configuration(format!(
                "Unsupported scheme '{}' in target '{}'",
                other, s
            ))),
        }
    }
}
