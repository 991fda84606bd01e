use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vt_cli::commands::{report, run};
use vt_cli::{Cli, Commands, Config};
use vt_core::tz;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Commands::Report { day, json }) => {
            let offset = tz::offset_hours(config.utc_offset_hours)
                .context("utc_offset_hours is out of range")?;
            let day = day.unwrap_or_else(|| Utc::now().with_timezone(&offset).date_naive());
            let db = vt_db::Database::open(&config.database_path)
                .context("failed to open database")?;
            report::run(&db, day, json)?;
        }
        Some(Commands::Run) | None => {
            run::run(config).await?;
        }
    }

    Ok(())
}
