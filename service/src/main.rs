use std::path::Path;

use abi::Config;
use anyhow::{anyhow, Result};
use hotel_service::start_server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let filename = config_file()?;
    info!("config file: {}", filename);
    let config = Config::load(&filename)?.with_database_url(std::env::var("DATABASE_URL").ok());

    start_server(&config).await
}

// we would first try HOTEL_CONFIG env var,
// then try "./hotel.yml", then try "~/.config/hotel.yml"
// then try "/etc/hotel.yml"
fn config_file() -> Result<String> {
    if let Ok(filename) = std::env::var("HOTEL_CONFIG") {
        return Ok(filename);
    }
    let home = shellexpand::tilde("~/.config/hotel.yml").into_owned();
    ["./hotel.yml".to_string(), home, "/etc/hotel.yml".to_string()]
        .into_iter()
        .find(|p| Path::new(p).exists())
        .ok_or_else(|| anyhow!("no config file found"))
}
