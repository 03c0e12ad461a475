//! Result type aliases for the Warden SDK.

use crate::WardenError;

/// A specialized `Result` type for Warden operations.
pub type WardenResult<T> = Result<T, WardenError>;

/// A boxed, sendable future returning a `WardenResult`.
pub type BoxFuture<'a, T> = futures::future::BoxFuture<'a, WardenResult<T>>;
