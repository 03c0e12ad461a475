//! Aggregate client handle.

use crate::connection::{AuthChannel, Connection};
use crate::credentials::{pat, CallCredentials, TokenSource};
use crate::options::{ClientOptions, TransportOption};
use crate::target::Target;
use crate::tls::TransportCredentials;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use warden_config::ClientSettings;
use warden_core::WardenResult;
use warden_proto::admin::v1::admin_service_client::AdminServiceClient;
use warden_proto::auth::v1::auth_service_client::AuthServiceClient;
use warden_proto::management::v1::management_service_client::ManagementServiceClient;
use warden_proto::oidc::v2::oidc_service_client::OidcServiceClient as OidcServiceV2Client;
use warden_proto::oidc::v2beta::oidc_service_client::OidcServiceClient;
use warden_proto::org::v2::organization_service_client::OrganizationServiceClient as OrganizationServiceV2Client;
use warden_proto::org::v2beta::organization_service_client::OrganizationServiceClient;
use warden_proto::session::v2::session_service_client::SessionServiceClient as SessionServiceV2Client;
use warden_proto::session::v2beta::session_service_client::SessionServiceClient;
use warden_proto::settings::v2::settings_service_client::SettingsServiceClient as SettingsServiceV2Client;
use warden_proto::settings::v2beta::settings_service_client::SettingsServiceClient;
use warden_proto::system::v1::system_service_client::SystemServiceClient;
use warden_proto::user::v2::user_service_client::UserServiceClient as UserServiceV2Client;
use warden_proto::user::v2beta::user_service_client::UserServiceClient;

/// Handle to every platform API over one authenticated connection.
///
/// Stub accessors return cheap clones bound to the shared connection.
/// Dropping the handle and every stub handed out closes the connection.
#[derive(Clone)]
pub struct Client {
    connection: Connection,
    system: SystemServiceClient<AuthChannel>,
    admin: AdminServiceClient<AuthChannel>,
    management: ManagementServiceClient<AuthChannel>,
    auth: AuthServiceClient<AuthChannel>,
    user: UserServiceClient<AuthChannel>,
    user_v2: UserServiceV2Client<AuthChannel>,
    settings: SettingsServiceClient<AuthChannel>,
    settings_v2: SettingsServiceV2Client<AuthChannel>,
    session: SessionServiceClient<AuthChannel>,
    session_v2: SessionServiceV2Client<AuthChannel>,
    organization: OrganizationServiceClient<AuthChannel>,
    organization_v2: OrganizationServiceV2Client<AuthChannel>,
    oidc: OidcServiceClient<AuthChannel>,
    oidc_v2: OidcServiceV2Client<AuthChannel>,
}

impl Client {
    /// Connects to `target` and binds a stub for every service.
    ///
    /// A configured token-source initializer runs first, with the target's
    /// origin; its error is returned unchanged and nothing is dialed. Any
    /// failure afterwards (TLS material, dial) is returned as well. No
    /// partial client is ever produced.
    pub async fn new(target: &Target, options: ClientOptions) -> WardenResult<Self> {
        let token_source: Option<Arc<dyn TokenSource>> = match options.token_source_initializer() {
            Some(init) => {
                debug!(origin = %target.origin(), "Initializing token source");
                Some(init(target.origin()).await?)
            }
            None => None,
        };

        let transport = TransportCredentials::new(target.domain(), target.is_tls(), target.ca_cert_path())?;
        let credentials = CallCredentials::new(target.is_tls(), token_source);

        let connection = Connection::open(target, options.dial_options(transport, credentials)).await?;

        info!(
            connection_id = %connection.id(),
            origin = %target.origin(),
            "Client ready"
        );

        Ok(Self::from_connection(connection))
    }

    /// Builds a client from loaded settings.
    ///
    /// A configured personal access token becomes the credentials, and the
    /// timeout, user agent and keepalive settings become transport options.
    pub async fn from_settings(settings: &ClientSettings) -> WardenResult<Self> {
        let target = Target::from_settings(settings);

        let mut transport_options = vec![TransportOption::ConnectTimeout(settings.connect_timeout())];
        if let Some(timeout) = settings.request_timeout() {
            transport_options.push(TransportOption::Timeout(timeout));
        }
        if let Some(user_agent) = &settings.user_agent {
            transport_options.push(TransportOption::UserAgent(user_agent.clone()));
        }
        if let Some(interval) = settings.tcp_keepalive() {
            transport_options.push(TransportOption::TcpKeepalive(Some(interval)));
        }

        let mut options = ClientOptions::new().with_transport_options(transport_options);
        if let Some(token) = &settings.personal_access_token {
            options = options.with_auth(pat(token.as_str()));
        }

        Self::new(&target, options).await
    }

    fn from_connection(connection: Connection) -> Self {
        let channel = connection.channel();
        let credentials = connection.credentials().clone();

        Self {
            system: SystemServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            admin: AdminServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            management: ManagementServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            auth: AuthServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            user: UserServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            user_v2: UserServiceV2Client::with_interceptor(channel.clone(), credentials.clone()),
            settings: SettingsServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            settings_v2: SettingsServiceV2Client::with_interceptor(channel.clone(), credentials.clone()),
            session: SessionServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            session_v2: SessionServiceV2Client::with_interceptor(channel.clone(), credentials.clone()),
            organization: OrganizationServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            organization_v2: OrganizationServiceV2Client::with_interceptor(channel.clone(), credentials.clone()),
            oidc: OidcServiceClient::with_interceptor(channel.clone(), credentials.clone()),
            oidc_v2: OidcServiceV2Client::with_interceptor(channel, credentials),
            connection,
        }
    }

    /// The connection shared by every stub.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn system_service(&self) -> SystemServiceClient<AuthChannel> {
        self.system.clone()
    }

    pub fn admin_service(&self) -> AdminServiceClient<AuthChannel> {
        self.admin.clone()
    }

    pub fn management_service(&self) -> ManagementServiceClient<AuthChannel> {
        self.management.clone()
    }

    pub fn auth_service(&self) -> AuthServiceClient<AuthChannel> {
        self.auth.clone()
    }

    /// User service, v2beta.
    pub fn user_service(&self) -> UserServiceClient<AuthChannel> {
        self.user.clone()
    }

    pub fn user_service_v2(&self) -> UserServiceV2Client<AuthChannel> {
        self.user_v2.clone()
    }

    /// Settings service, v2beta.
    pub fn settings_service(&self) -> SettingsServiceClient<AuthChannel> {
        self.settings.clone()
    }

    pub fn settings_service_v2(&self) -> SettingsServiceV2Client<AuthChannel> {
        self.settings_v2.clone()
    }

    /// Session service, v2beta.
    pub fn session_service(&self) -> SessionServiceClient<AuthChannel> {
        self.session.clone()
    }

    pub fn session_service_v2(&self) -> SessionServiceV2Client<AuthChannel> {
        self.session_v2.clone()
    }

    /// Organization service, v2beta.
    pub fn organization_service(&self) -> OrganizationServiceClient<AuthChannel> {
        self.organization.clone()
    }

    pub fn organization_service_v2(&self) -> OrganizationServiceV2Client<AuthChannel> {
        self.organization_v2.clone()
    }

    /// OIDC service, v2beta.
    pub fn oidc_service(&self) -> OidcServiceClient<AuthChannel> {
        self.oidc.clone()
    }

    pub fn oidc_service_v2(&self) -> OidcServiceV2Client<AuthChannel> {
        self.oidc_v2.clone()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::token_source_initializer;
    use warden_core::WardenError;

    #[tokio::test]
    async fn test_initializer_receives_origin() {
        let target = Target::new("127.0.0.1").with_insecure(1);
        let init = token_source_initializer(|origin: String| async move {
            Err::<Arc<dyn TokenSource>, _>(WardenError::unauthorized(origin))
        });

        let err = Client::new(&target, ClientOptions::new().with_auth(init)).await.unwrap_err();
        match err {
            WardenError::Unauthorized(message) => assert_eq!(message, "http://127.0.0.1:1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pat_over_plaintext_is_allowed_to_dial() {
        // Fails at the dial, not at the credential check
        let target = Target::new("127.0.0.1").with_insecure(1);
        let options = ClientOptions::new().with_auth(pat("tok123"));

        let err = Client::new(&target, options).await.unwrap_err();
        assert!(matches!(err, WardenError::Transport(_)));
    }

    #[tokio::test]
    async fn test_from_settings_rejects_unreadable_ca() {
        let settings = ClientSettings {
            domain: "localhost".to_string(),
            ca_cert_path: Some("/nonexistent/warden/ca.pem".to_string()),
            ..Default::default()
        };

        let err = Client::from_settings(&settings).await.unwrap_err();
        assert!(matches!(err, WardenError::Configuration(_)));
    }
}
