use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use grad_records::config::{self, DEFAULT_CONFIG_PATH};
use grad_records::utils::logging;
use grad_records::{ui, GradRecordsClient};

/// Browse and edit the graduate records database
#[derive(Debug, Parser)]
#[command(name = "grad_records", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Open a table on start; may be repeated
    #[arg(short, long = "open", value_name = "TABLE")]
    open: Vec<String>,

    /// Open every known table on start
    #[arg(long)]
    all: bool,

    /// Log level (trace, debug, info, warn, error); needs a log file in the config
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    logging::init_logging(&config.logging, cli.log_level.as_deref())?;

    let client = GradRecordsClient::new(config)
        .await
        .context("connecting to the database")?;

    for table in &cli.open {
        if !client.catalog().contains(table) {
            bail!("unknown table: {}", table);
        }
    }

    match client.missing_tables().await {
        Ok(missing) if !missing.is_empty() => {
            tracing::warn!(?missing, "Configured tables are absent from the database");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not list database tables"),
    }

    let mut app = client.app();
    if cli.all {
        app.open_all().await;
    } else {
        for table in &cli.open {
            app.open_table(table).await;
        }
    }

    let result = ui::run(&mut app).await;
    client.close().await;
    result?;

    Ok(())
}
