//! Prints the user behind the configured personal access token.
//!
//! Reads settings from `./config` and `WARDEN__CLIENT__*` variables, e.g.
//!
//! ```sh
//! WARDEN__CLIENT__DOMAIN=auth.example.com \
//! WARDEN__CLIENT__PERSONAL_ACCESS_TOKEN=... \
//! cargo run -p warden-client --example whoami
//! ```

use warden_client::proto::auth::v1::GetMyUserRequest;
use warden_client::Client;
use warden_config::SettingsLoader;
use warden_core::{init_tracing, WardenResult};

#[tokio::main]
async fn main() -> WardenResult<()> {
    let loader = SettingsLoader::from_default_location()?;
    let config = loader.get().await;
    init_tracing(&config.telemetry)?;

    let client = Client::from_settings(&config.client).await?;

    match client.auth_service().get_my_user(GetMyUserRequest {}).await {
        Ok(response) => match response.into_inner().user {
            Some(user) => println!("{} ({})", user.preferred_login_name, user.id),
            None => println!("No user returned"),
        },
        Err(status) => eprintln!("GetMyUser failed: {} {}", status.code(), status.message()),
    }

    Ok(())
}
