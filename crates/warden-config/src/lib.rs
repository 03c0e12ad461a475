//! # Warden Config
//!
//! Configuration management for the Warden SDK.
//! Settings are layered from TOML files and `WARDEN__*` environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
