//! # Warden Client
//!
//! Authenticated gRPC client for the Warden identity platform.
//!
//! A [`Client`] opens one connection to a platform instance and binds a stub
//! for every platform API to it. Calls from any stub carry the credentials
//! configured through [`ClientOptions::with_auth`].
//!
//! ```no_run
//! use warden_client::{pat, Client, ClientOptions, Target, TransportOption};
//! use std::time::Duration;
//!
//! # async fn run() -> warden_core::WardenResult<()> {
//! let options = ClientOptions::new()
//!     .with_auth(pat("my-personal-access-token"))
//!     .with_transport_options([TransportOption::ConnectTimeout(Duration::from_secs(5))]);
//!
//! let client = Client::new(&Target::new("auth.example.com"), options).await?;
//! let me = client
//!     .auth_service()
//!     .get_my_user(warden_client::proto::auth::v1::GetMyUserRequest {})
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;
pub mod credentials;
pub mod options;
pub mod target;
pub mod tls;

pub use client::Client;
pub use connection::{AuthChannel, Connection};
pub use credentials::{
    pat, token_source_initializer, AccessToken, CallCredentials, StaticTokenSource, TokenSource,
    TokenSourceInitializer, AUTHORIZATION_METADATA_KEY, BEARER_PREFIX,
};
pub use options::{ClientOptions, DialOption, TransportOption};
pub use target::Target;
pub use tls::TransportCredentials;

/// Generated message and stub types.
pub use warden_proto as proto;
