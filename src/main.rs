use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use anyhow::{Context, Result};
use warranty_scanner::config::USAGE;
use warranty_scanner::error::ConfigError;
use warranty_scanner::{logging, run_scan, serial, Config, VendorClient, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingAmount) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let _guard = match logging::init(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_stderr();
            tracing::warn!("file logging disabled, {}: {e}", config.log_dir.display());
            None
        }
    };
    tracing::info!(
        version = VERSION,
        amount = config.amount,
        concurrency = config.concurrency,
        "starting scan against {}",
        config.api_base
    );

    let client = Arc::new(VendorClient::new(config.api_base.as_str())?);
    let serials = serial::generate_serials(config.amount);

    let file = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    let mut sink = BufWriter::new(file);

    let summary = run_scan(client, serials, config.concurrency, &mut sink).await?;

    println!(
        "Serials saved to {} ({} active, {} expired, {} other)",
        config.output.display(),
        summary.active,
        summary.expired,
        summary.other
    );
    Ok(())
}
