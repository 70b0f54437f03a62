use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use daily_schedule::http_api::{self, AppState};
use daily_schedule::{AppConfig, CliArgs, init_logging, load_or_seed, open_store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();
    let config = AppConfig::load(&cli)?;
    init_logging(&config.log_level)?;

    let addr: SocketAddr = config.bind_addr.parse()?;
    let store: http_api::SharedStore = Arc::from(open_store(&config)?);
    let schedule = load_or_seed(store.as_ref())?;

    tracing::info!(
        document = %config.document_path.display(),
        store = ?config.store_kind,
        timezone = %config.timezone,
        "starting daily-schedule HTTP API"
    );
    http_api::serve(addr, AppState::with_store(schedule, store)).await?;
    Ok(())
}
