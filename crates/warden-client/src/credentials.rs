//! Per-call credentials.
//!
//! A [`TokenSource`] hands out bearer tokens; [`CallCredentials`] turns the
//! current token into request metadata on every outbound call. One
//! `CallCredentials` is shared by every stub of a client.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};
use warden_core::{BoxFuture, WardenError, WardenResult};

/// Metadata key carrying the bearer token.
pub const AUTHORIZATION_METADATA_KEY: &str = "authorization";

/// Authorization scheme of the tokens sent.
pub const BEARER_PREFIX: &str = "Bearer";

/// An access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Produces a currently valid access token on demand.
///
/// Called once per outbound call, concurrently from every stub sharing the
/// connection. Implementations own any caching and refreshing, and must not
/// block the async runtime while doing so.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> WardenResult<AccessToken>;
}

impl<F> TokenSource for F
where
    F: Fn() -> WardenResult<AccessToken> + Send + Sync,
{
    fn token(&self) -> WardenResult<AccessToken> {
        self()
    }
}

/// Token source for a pre-issued personal access token.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: AccessToken,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<AccessToken>) -> Self {
        Self { token: token.into() }
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> WardenResult<AccessToken> {
        Ok(self.token.clone())
    }
}

/// Creates a token source for the instance at the given origin.
///
/// Invoked once while a client is being built; its error aborts the build
/// unchanged.
pub type TokenSourceInitializer =
    Arc<dyn Fn(String) -> BoxFuture<'static, Arc<dyn TokenSource>> + Send + Sync>;

/// Wraps an async closure into a [`TokenSourceInitializer`].
pub fn token_source_initializer<F, Fut>(init: F) -> TokenSourceInitializer
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = WardenResult<Arc<dyn TokenSource>>> + Send + 'static,
{
    Arc::new(move |origin: String| -> BoxFuture<'static, Arc<dyn TokenSource>> {
        Box::pin(init(origin))
    })
}

/// Authenticates with a personal access token.
pub fn pat(token: impl Into<AccessToken>) -> TokenSourceInitializer {
    let token = token.into();
    token_source_initializer(move |origin| {
        let source: Arc<dyn TokenSource> = Arc::new(StaticTokenSource::new(token.clone()));
        async move {
            debug!(origin = %origin, "Using personal access token");
            Ok(source)
        }
    })
}

/// Attaches authorization metadata to outbound calls.
///
/// Cloning is cheap and every clone shares the same token source.
#[derive(Clone)]
pub struct CallCredentials {
    inner: Arc<CredentialsInner>,
}

struct CredentialsInner {
    tls: bool,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl CallCredentials {
    pub fn new(tls: bool, token_source: Option<Arc<dyn TokenSource>>) -> Self {
        Self {
            inner: Arc::new(CredentialsInner { tls, token_source }),
        }
    }

    /// Credentials that add no metadata.
    pub fn anonymous(tls: bool) -> Self {
        Self::new(tls, None)
    }

    /// Returns the metadata for one outbound call.
    ///
    /// Empty without a token source. Otherwise a single `authorization`
    /// entry holding the token source's current token; its errors are
    /// returned unchanged.
    pub fn request_metadata(&self) -> WardenResult<HashMap<String, String>> {
        let Some(source) = &self.inner.token_source else {
            return Ok(HashMap::new());
        };

        let token = source.token()?;
        let mut metadata = HashMap::with_capacity(1);
        metadata.insert(
            AUTHORIZATION_METADATA_KEY.to_string(),
            format!("{} {}", BEARER_PREFIX, token.secret()),
        );
        Ok(metadata)
    }

    /// Whether this metadata may only travel over an encrypted channel.
    pub fn requires_transport_security(&self) -> bool {
        self.inner.tls
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token_source.is_some()
    }

    /// Returns true if both values share the same underlying credentials.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CallCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallCredentials")
            .field("tls", &self.inner.tls)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Interceptor for CallCredentials {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let metadata = self.request_metadata().map_err(|e| {
            warn!("Failed to obtain request credentials: {}", e);
            Status::from(e)
        })?;

        for (key, value) in metadata {
            let key: AsciiMetadataKey = key
                .parse()
                .map_err(|_| Status::from(WardenError::InvalidMetadata(format!("invalid key '{}'", key))))?;
            let value: AsciiMetadataValue = value.parse().map_err(|_| {
                Status::from(WardenError::InvalidMetadata(format!("invalid value for '{}'", key.as_str())))
            })?;
            request.metadata_mut().insert(key, value);
        }

        Ok(request)
    }
}
