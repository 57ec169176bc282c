//! SalesPilot backend
//!
//! Axum server for the sales automation platform: voice-provider webhook
//! routing, outbound call placement, and operator read endpoints.

mod models;
mod server;

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("salespilot=info".parse()?))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = server::config::AppConfig::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::run_server(config))
}
