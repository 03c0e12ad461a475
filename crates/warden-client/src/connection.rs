//! The shared transport connection.

use crate::credentials::CallCredentials;
use crate::options::DialOption;
use crate::target::Target;
use crate::tls::TransportCredentials;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};
use uuid::Uuid;
use warden_core::{WardenError, WardenResult};

/// A channel whose calls carry the client's credentials.
pub type AuthChannel = InterceptedService<Channel, CallCredentials>;

/// One established connection to a platform instance.
///
/// Every stub of a [`Client`](crate::Client) holds a clone of the same
/// channel, so all calls are multiplexed over this connection.
#[derive(Debug, Clone)]
pub struct Connection {
    id: Uuid,
    target: Target,
    channel: Channel,
    credentials: CallCredentials,
}

impl Connection {
    /// Dials `target`, applying `options` in order.
    ///
    /// The sequence must contain exactly one [`DialOption::TransportSecurity`]. Without
    /// a [`DialOption::CallCredentials`] calls are sent anonymously.
    pub async fn open(target: &Target, options: Vec<DialOption>) -> WardenResult<Self> {
        let mut endpoint = Endpoint::from_shared(target.uri())?;
        let mut transport: Option<TransportCredentials> = None;
        let mut credentials: Option<CallCredentials> = None;

        for option in options {
            match option {
                DialOption::TransportSecurity(security) => {
                    if transport.is_some() {
                        return Err(WardenError::configuration(
                            "Transport security configured more than once for connection",
                        ));
                    }
                    endpoint = security.apply(endpoint)?;
                    transport = Some(security);
                }
                DialOption::CallCredentials(call) => credentials = Some(call),
                DialOption::Transport(option) => {
                    debug!(?option, "Applying transport option");
                    endpoint = option.apply(endpoint)?;
                }
            }
        }

        let transport = transport.ok_or_else(|| {
            WardenError::configuration("No transport security configured for connection")
        })?;

        if transport.is_tls() != target.is_tls() {
            return Err(WardenError::configuration(format!(
                "Transport security does not match target {}",
                target.origin()
            )));
        }

        let credentials = credentials.unwrap_or_else(|| CallCredentials::anonymous(transport.is_tls()));
        if credentials.requires_transport_security() && !transport.is_tls() {
            return Err(WardenError::configuration(
                "Credentials require transport security but the connection is plaintext",
            ));
        }

        let id = Uuid::now_v7();
        info!(
            connection_id = %id,
            uri = %target.uri(),
            tls = transport.is_tls(),
            authenticated = credentials.is_authenticated(),
            "Opening connection"
        );

        let channel = endpoint.connect().await?;

        info!(connection_id = %id, "Connection established");

        Ok(Self {
            id,
            target: target.clone(),
            channel,
            credentials,
        })
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn target(&self) -> &Target {
        &self.target
    }

    pub const fn credentials(&self) -> &CallCredentials {
        &self.credentials
    }

    /// Returns the raw channel, without credentials.
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    /// Returns the channel wrapped with the connection's credentials.
    pub fn intercepted(&self) -> AuthChannel {
        InterceptedService::new(self.channel.clone(), self.credentials.clone())
    }
}
