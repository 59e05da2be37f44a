use std::env;
use std::error::Error;

use payroll_sheets::api::{AppState, create_router};
use payroll_sheets::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("payroll_sheets=info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    let config_dir =
        env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("PAYROLL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let loader = ConfigLoader::load(&config_dir)?;
    info!(config_dir = %config_dir, "Configuration loaded");

    let router = create_router(AppState::new(loader.into_config()));
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
