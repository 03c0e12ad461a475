//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::net::Ipv6Addr;
use std::time::Duration;
use warden_core::TelemetryConfig;

/// Default port for TLS connections.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Default port for plaintext connections.
pub const DEFAULT_PLAINTEXT_PORT: u16 = 80;

/// Formats `host:port`, bracketing IPv6 literals.
#[must_use]
pub fn authority(host: &str, port: u16) -> String {
    format!("{}:{}", host_literal(host), port)
}

/// Formats the origin of an instance, omitting the scheme's default port.
#[must_use]
pub fn origin(tls: bool, host: &str, port: u16) -> String {
    let (scheme, default_port) = if tls {
        ("https", DEFAULT_TLS_PORT)
    } else {
        ("http", DEFAULT_PLAINTEXT_PORT)
    };
    if port == default_port {
        format!("{}://{}", scheme, host_literal(host))
    } else {
        format!("{}://{}", scheme, authority(host, port))
    }
}

fn host_literal(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Connection settings for the platform instance.
    #[serde(default)]
    pub client: ClientSettings,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Connection settings for one platform instance.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Domain of the instance, e.g. `auth.example.com`.
    pub domain: String,
    /// Port override. Required when `insecure` is set.
    pub port: Option<u16>,
    /// Connect without TLS.
    pub insecure: bool,
    /// PEM bundle used instead of the native root store.
    pub ca_cert_path: Option<String>,
    /// Pre-issued personal access token.
    pub personal_access_token: Option<String>,
    /// Dial timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
    /// TCP keepalive interval in seconds.
    pub tcp_keepalive_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            port: None,
            insecure: false,
            ca_cert_path: None,
            personal_access_token: None,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            user_agent: None,
            tcp_keepalive_secs: None,
        }
    }
}

// Hand-written so the access token never ends up in logs.
impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("domain", &self.domain)
            .field("port", &self.port)
            .field("insecure", &self.insecure)
            .field("ca_cert_path", &self.ca_cert_path)
            .field(
                "personal_access_token",
                &self.personal_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("tcp_keepalive_secs", &self.tcp_keepalive_secs)
            .finish()
    }
}

impl ClientSettings {
    /// Whether connections use TLS.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        !self.insecure
    }

    /// Returns the effective port.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_TLS_PORT)
    }

    /// Returns the externally visible origin, e.g. `https://auth.example.com`.
    #[must_use]
    pub fn origin(&self) -> String {
        let port = self.port.unwrap_or(if self.is_tls() {
            DEFAULT_TLS_PORT
        } else {
            DEFAULT_PLAINTEXT_PORT
        });
        origin(self.is_tls(), &self.domain, port)
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the request timeout as a Duration, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Returns the TCP keepalive interval as a Duration, if configured.
    #[must_use]
    pub fn tcp_keepalive(&self) -> Option<Duration> {
        self.tcp_keepalive_secs.map(Duration::from_secs)
    }
}
