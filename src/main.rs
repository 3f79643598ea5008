use anyhow::{Context, Result};
use tracing::info;

use airport_profile::{AppConfig, AppState, VERSION, api, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;
    info!(version = VERSION, debug = config.debug, "starting airport-profile");

    let state = AppState::from_config(&config).context("Failed to initialise services")?;
    web::run(&config.server, api::router(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
