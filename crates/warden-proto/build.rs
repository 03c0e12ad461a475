//! Build script for compiling protobuf definitions.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Servers are generated too so tests can stand up in-process fakes
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/warden/object/v2/object.proto",
                "proto/warden/system/v1/system.proto",
                "proto/warden/admin/v1/admin.proto",
                "proto/warden/management/v1/management.proto",
                "proto/warden/auth/v1/auth.proto",
                "proto/warden/user/v2beta/user.proto",
                "proto/warden/user/v2/user.proto",
                "proto/warden/settings/v2beta/settings.proto",
                "proto/warden/settings/v2/settings.proto",
                "proto/warden/session/v2beta/session.proto",
                "proto/warden/session/v2/session.proto",
                "proto/warden/org/v2beta/org.proto",
                "proto/warden/org/v2/org.proto",
                "proto/warden/oidc/v2beta/oidc.proto",
                "proto/warden/oidc/v2/oidc.proto",
            ],
            &["proto"],
        )?;

    println!("cargo:rerun-if-changed=proto/");

    Ok(())
}
