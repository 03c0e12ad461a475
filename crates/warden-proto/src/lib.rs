//! # Warden Proto
//!
//! Protobuf messages and gRPC stubs for every Warden platform API, generated
//! by `tonic-build`. The module tree mirrors the protobuf packages so that
//! cross-package references resolve.

#[allow(clippy::all, clippy::pedantic)]
pub mod warden {
    pub mod object {
        pub mod v2 {
            tonic::include_proto!("warden.object.v2");
        }
    }

    pub mod system {
        pub mod v1 {
            tonic::include_proto!("warden.system.v1");
        }
    }

    pub mod admin {
        pub mod v1 {
            tonic::include_proto!("warden.admin.v1");
        }
    }

    pub mod management {
        pub mod v1 {
            tonic::include_proto!("warden.management.v1");
        }
    }

    pub mod auth {
        pub mod v1 {
            tonic::include_proto!("warden.auth.v1");
        }
    }

    pub mod user {
        pub mod v2beta {
            tonic::include_proto!("warden.user.v2beta");
        }
        pub mod v2 {
            tonic::include_proto!("warden.user.v2");
        }
    }

    pub mod settings {
        pub mod v2beta {
            tonic::include_proto!("warden.settings.v2beta");
        }
        pub mod v2 {
            tonic::include_proto!("warden.settings.v2");
        }
    }

    pub mod session {
        pub mod v2beta {
            tonic::include_proto!("warden.session.v2beta");
        }
        pub mod v2 {
            tonic::include_proto!("warden.session.v2");
        }
    }

    pub mod org {
        pub mod v2beta {
            tonic::include_proto!("warden.org.v2beta");
        }
        pub mod v2 {
            tonic::include_proto!("warden.org.v2");
        }
    }

    pub mod oidc {
        pub mod v2beta {
            tonic::include_proto!("warden.oidc.v2beta");
        }
        pub mod v2 {
            tonic::include_proto!("warden.oidc.v2");
        }
    }
}

pub use warden::*;
