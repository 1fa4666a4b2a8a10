//! trialwatch server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), points a
//! workbook source at the configured data directory, and serves the
//! dashboard API over HTTP.
//!
//! # Checking a data directory
//!
//! ```sh
//! cargo run -p trialwatch-server -- --check
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trialwatch_core::source::DatasetSource as _;
use trialwatch_server::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Clinical trial oversight dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load every data file once, print row counts and exit.
  #[arg(long)]
  check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TRIALWATCH").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let (source, app) = trialwatch_server::app(&server_cfg);

  // Helper mode: validate the data directory and exit.
  if cli.check {
    let snapshot = source
      .load()
      .await
      .with_context(|| format!("failed to load data from {:?}", server_cfg.data_dir))?;
    let data = &snapshot.datasets;
    println!("version   {}", snapshot.version);
    println!("subjects  {}", data.subjects.len());
    println!("sites     {}", data.sites.len());
    println!("countries {}", data.countries.len());
    println!("regions   {}", data.regions.len());
    return Ok(());
  }

  if !server_cfg.report_path().exists() {
    tracing::warn!(path = %server_cfg.report_path().display(), "CRA report not found");
  }

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
