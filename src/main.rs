use anyhow::Result;
use qr_shortener::config::{self, Config};
use qr_shortener::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    init_logging(&config);
    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber with `RUST_LOG` filtering and the
/// configured output format.
fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
