//! In-process platform server for client integration tests.
//!
//! Serves fake auth, system and v2 user services on a loopback port,
//! records the `authorization` header of every request and counts
//! accepted TCP connections.

use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use warden_client::proto::auth::v1 as auth;
use warden_client::proto::system::v1 as system;
use warden_client::proto::user::v2 as user;
use warden_client::Target;

/// Authorization headers seen by the server, in arrival order.
type SeenHeaders = Arc<Mutex<Vec<Option<String>>>>;

#[derive(Clone, Default)]
struct FakePlatform {
    seen: SeenHeaders,
}

impl FakePlatform {
    fn record<T>(&self, request: &Request<T>) {
        let header = request
            .metadata()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push(header);
    }
}

#[tonic::async_trait]
impl auth::auth_service_server::AuthService for FakePlatform {
    async fn healthz(
        &self,
        request: Request<auth::HealthzRequest>,
    ) -> Result<Response<auth::HealthzResponse>, Status> {
        self.record(&request);
        Ok(Response::new(auth::HealthzResponse {}))
    }

    async fn get_my_user(
        &self,
        request: Request<auth::GetMyUserRequest>,
    ) -> Result<Response<auth::GetMyUserResponse>, Status> {
        self.record(&request);
        Ok(Response::new(auth::GetMyUserResponse {
            user: Some(auth::User {
                id: "user-1".to_string(),
                user_name: "alice".to_string(),
                preferred_login_name: "alice@example.com".to_string(),
                details: None,
            }),
        }))
    }
}

#[tonic::async_trait]
impl system::system_service_server::SystemService for FakePlatform {
    async fn healthz(
        &self,
        request: Request<system::HealthzRequest>,
    ) -> Result<Response<system::HealthzResponse>, Status> {
        self.record(&request);
        Ok(Response::new(system::HealthzResponse {}))
    }

    async fn list_instances(
        &self,
        request: Request<system::ListInstancesRequest>,
    ) -> Result<Response<system::ListInstancesResponse>, Status> {
        self.record(&request);
        Ok(Response::new(system::ListInstancesResponse {
            details: None,
            result: vec![system::Instance {
                id: "instance-1".to_string(),
                name: "default".to_string(),
                details: None,
                domains: vec!["auth.example.com".to_string()],
            }],
        }))
    }
}

#[tonic::async_trait]
impl user::user_service_server::UserService for FakePlatform {
    async fn add_human_user(
        &self,
        request: Request<user::AddHumanUserRequest>,
    ) -> Result<Response<user::AddHumanUserResponse>, Status> {
        self.record(&request);
        let user_id = request
            .into_inner()
            .user_id
            .unwrap_or_else(|| "generated-id".to_string());
        Ok(Response::new(user::AddHumanUserResponse { user_id, details: None }))
    }

    async fn get_user_by_id(
        &self,
        request: Request<user::GetUserByIdRequest>,
    ) -> Result<Response<user::GetUserByIdResponse>, Status> {
        self.record(&request);
        Err(Status::not_found(format!("user {} not found", request.get_ref().user_id)))
    }
}

/// A running fake platform. Stops when dropped.
pub struct TestServer {
    addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    seen: SeenHeaders,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener address");

        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        let incoming = TcpListenerStream::new(listener).inspect(move |conn| {
            if conn.is_ok() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let platform = FakePlatform::default();
        let seen = platform.seen.clone();

        let router = Server::builder()
            .add_service(auth::auth_service_server::AuthServiceServer::new(platform.clone()))
            .add_service(system::system_service_server::SystemServiceServer::new(platform.clone()))
            .add_service(user::user_service_server::UserServiceServer::new(platform));

        let handle = tokio::spawn(async move {
            if let Err(e) = router.serve_with_incoming(incoming).await {
                eprintln!("test server failed: {}", e);
            }
        });

        Self {
            addr,
            accepted,
            seen,
            handle,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Plaintext target pointing at this server.
    pub fn target(&self) -> Target {
        Target::new("127.0.0.1").with_insecure(self.port())
    }

    /// Number of TCP connections accepted so far.
    pub fn accepted_connections(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Authorization headers of every request served so far.
    pub fn authorization_headers(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Installs the tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = warden_core::init_tracing(&warden_core::TelemetryConfig {
        log_level: "warn,warden_client=debug".to_string(),
        ..Default::default()
    });
}
