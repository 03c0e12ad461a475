//! # Warden Core
//!
//! Error definitions, result aliases and tracing setup shared by every
//! crate of the Warden SDK.

pub mod error;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use telemetry::*;
