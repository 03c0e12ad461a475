//! Tracing subscriber setup for applications embedding the SDK.
//!
//! The SDK itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init_tracing`] once at startup.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::WardenResult;
use serde::{Deserialize, Serialize};

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Whether to write to the console at all.
    #[serde(default = "default_console_output")]
    pub console_output: bool,
}

fn default_log_level() -> String {
    "info,warden=debug".to_string()
}

fn default_console_output() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            console_output: default_console_output(),
        }
    }
}

/// Installs a global tracing subscriber.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> WardenResult<()> {
    if !config.console_output {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| crate::WardenError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::debug!(json = config.json, "Tracing initialized");
    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> WardenResult<()> {
    Ok(())
}
