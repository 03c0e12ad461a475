//! Client options.
//!
//! Options are applied in the order they are chained. Transport options
//! accumulate; the authentication initializer is replaced by each later
//! `with_auth`.

use crate::credentials::{CallCredentials, TokenSourceInitializer};
use crate::tls::TransportCredentials;
use std::fmt;
use std::time::Duration;
use tonic::transport::Endpoint;
use warden_core::WardenResult;

/// Extra configuration for the underlying transport endpoint.
///
/// When two options set the same knob the later one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOption {
    /// Timeout for establishing the connection.
    ConnectTimeout(Duration),
    /// Timeout applied to every request.
    Timeout(Duration),
    /// `user-agent` header sent with every request.
    UserAgent(String),
    TcpKeepalive(Option<Duration>),
    TcpNodelay(bool),
    /// Interval of HTTP/2 keepalive pings.
    Http2KeepAliveInterval(Duration),
    /// How long to wait for a keepalive ping acknowledgement.
    KeepAliveTimeout(Duration),
    KeepAliveWhileIdle(bool),
    /// Maximum number of in-flight requests.
    ConcurrencyLimit(usize),
    /// At most `limit` requests per `per`.
    RateLimit { limit: u64, per: Duration },
    InitialStreamWindowSize(Option<u32>),
    InitialConnectionWindowSize(Option<u32>),
    BufferSize(Option<usize>),
}

impl TransportOption {
    pub(crate) fn apply(&self, endpoint: Endpoint) -> WardenResult<Endpoint> {
        let endpoint = match self {
            Self::ConnectTimeout(timeout) => endpoint.connect_timeout(*timeout),
            Self::Timeout(timeout) => endpoint.timeout(*timeout),
            Self::UserAgent(user_agent) => endpoint.user_agent(user_agent.clone())?,
            Self::TcpKeepalive(interval) => endpoint.tcp_keepalive(*interval),
            Self::TcpNodelay(enabled) => endpoint.tcp_nodelay(*enabled),
            Self::Http2KeepAliveInterval(interval) => endpoint.http2_keep_alive_interval(*interval),
            Self::KeepAliveTimeout(timeout) => endpoint.keep_alive_timeout(*timeout),
            Self::KeepAliveWhileIdle(enabled) => endpoint.keep_alive_while_idle(*enabled),
            Self::ConcurrencyLimit(limit) => endpoint.concurrency_limit(*limit),
            Self::RateLimit { limit, per } => endpoint.rate_limit(*limit, *per),
            Self::InitialStreamWindowSize(size) => endpoint.initial_stream_window_size(*size),
            Self::InitialConnectionWindowSize(size) => endpoint.initial_connection_window_size(*size),
            Self::BufferSize(size) => endpoint.buffer_size(*size),
        };
        Ok(endpoint)
    }
}

/// One step of opening a connection, in the order it is applied.
#[derive(Debug, Clone)]
pub enum DialOption {
    /// TLS or plaintext transport. Always first.
    TransportSecurity(TransportCredentials),
    /// Per-call credentials attached to every stub. Always second.
    CallCredentials(CallCredentials),
    /// Caller-supplied transport configuration.
    Transport(TransportOption),
}

/// Options accepted by [`Client::new`](crate::Client::new).
#[derive(Clone, Default)]
pub struct ClientOptions {
    init_token_source: Option<TokenSourceInitializer>,
    transport_options: Vec<TransportOption>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates calls with the token source the initializer produces,
    /// e.g. [`pat`](crate::pat). Replaces any earlier initializer.
    #[must_use]
    pub fn with_auth(mut self, init_token_source: TokenSourceInitializer) -> Self {
        self.init_token_source = Some(init_token_source);
        self
    }

    /// Appends transport options. May be called repeatedly.
    #[must_use]
    pub fn with_transport_options(mut self, options: impl IntoIterator<Item = TransportOption>) -> Self {
        self.transport_options.extend(options);
        self
    }

    pub fn token_source_initializer(&self) -> Option<&TokenSourceInitializer> {
        self.init_token_source.as_ref()
    }

    pub fn transport_options(&self) -> &[TransportOption] {
        &self.transport_options
    }

    /// Full dial sequence: transport security, call credentials, then the
    /// caller's transport options in the order given.
    pub(crate) fn dial_options(
        &self,
        transport: TransportCredentials,
        credentials: CallCredentials,
    ) -> Vec<DialOption> {
        let mut options = Vec::with_capacity(self.transport_options.len() + 2);
        options.push(DialOption::TransportSecurity(transport));
        options.push(DialOption::CallCredentials(credentials));
        options.extend(self.transport_options.iter().cloned().map(DialOption::Transport));
        options
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("auth", &self.init_token_source.is_some())
            .field("transport_options", &self.transport_options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{pat, AccessToken, TokenSource};
    use std::sync::Arc;

    const A: TransportOption = TransportOption::ConnectTimeout(Duration::from_secs(5));
    const B: TransportOption = TransportOption::TcpNodelay(false);

    #[test]
    fn test_transport_options_accumulate_in_order() {
        let options = ClientOptions::new()
            .with_transport_options([A])
            .with_transport_options([B]);

        assert_eq!(options.transport_options(), &[A, B]);
    }

    #[test]
    fn test_dial_sequence_puts_mandatory_options_first() {
        let options = ClientOptions::new()
            .with_transport_options([A])
            .with_transport_options([B]);

        let dial = options.dial_options(TransportCredentials::insecure(), CallCredentials::anonymous(false));

        assert_eq!(dial.len(), 4);
        assert!(matches!(dial[0], DialOption::TransportSecurity(_)));
        assert!(matches!(dial[1], DialOption::CallCredentials(_)));
        assert!(matches!(&dial[2], DialOption::Transport(opt) if *opt == A));
        assert!(matches!(&dial[3], DialOption::Transport(opt) if *opt == B));
    }

    #[test]
    fn test_dial_sequence_without_extra_options() {
        let dial = ClientOptions::new()
            .dial_options(TransportCredentials::insecure(), CallCredentials::anonymous(false));
        assert_eq!(dial.len(), 2);
    }

    #[tokio::test]
    async fn test_last_auth_wins() {
        let options = ClientOptions::new().with_auth(pat("first")).with_auth(pat("second"));

        let init = options.token_source_initializer().unwrap();
        let source: Arc<dyn TokenSource> = init("https://example.com".to_string()).await.unwrap();
        assert_eq!(source.token().unwrap(), AccessToken::new("second"));
    }

    #[test]
    fn test_no_auth_by_default() {
        assert!(ClientOptions::new().token_source_initializer().is_none());
    }

    #[test]
    fn test_every_transport_option_applies() {
        let all = [
            TransportOption::ConnectTimeout(Duration::from_secs(1)),
            TransportOption::Timeout(Duration::from_secs(2)),
            TransportOption::UserAgent("warden-sdk/test".to_string()),
            TransportOption::TcpKeepalive(Some(Duration::from_secs(30))),
            TransportOption::TcpNodelay(true),
            TransportOption::Http2KeepAliveInterval(Duration::from_secs(20)),
            TransportOption::KeepAliveTimeout(Duration::from_secs(5)),
            TransportOption::KeepAliveWhileIdle(true),
            TransportOption::ConcurrencyLimit(64),
            TransportOption::RateLimit { limit: 100, per: Duration::from_secs(1) },
            TransportOption::InitialStreamWindowSize(Some(1 << 20)),
            TransportOption::InitialConnectionWindowSize(Some(1 << 21)),
            TransportOption::BufferSize(Some(2048)),
        ];

        let mut endpoint = Endpoint::from_static("http://localhost:8080");
        for option in &all {
            endpoint = option.apply(endpoint).unwrap();
        }
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let option = TransportOption::UserAgent("bad\nagent".to_string());
        assert!(option.apply(Endpoint::from_static("http://localhost:8080")).is_err());
    }
}
