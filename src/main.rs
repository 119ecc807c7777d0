use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrobble_stats::config::{AppConfig, CliConfig, FileConfig};
use scrobble_stats::datasets;
use scrobble_stats::lastfm::LastFmClient;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the TOML config file with API credentials and lookup tables.
    #[clap(long, default_value = "scrobble-stats.toml")]
    pub config: PathBuf,

    /// Directory for cached datasets.
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for the derived summary tables.
    #[clap(long)]
    pub results_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = FileConfig::load(&cli_args.config)?;
    let cli_config = CliConfig {
        data_dir: cli_args.data_dir,
        results_dir: cli_args.results_dir,
    };
    let config = AppConfig::resolve(&cli_config, Some(file_config))?;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", config.data_dir))?;
    std::fs::create_dir_all(&config.results_dir)
        .with_context(|| format!("Failed to create results directory {:?}", config.results_dir))?;

    let client = LastFmClient::new(
        &config.api_key,
        &config.user_agent,
        config.artist_request_interval,
        config.track_request_interval,
    )?;

    info!("Building geographic top artists dataset...");
    datasets::geographic::run(&config, &client)?;

    info!("Building global chart dataset...");
    datasets::chart::run(&config, &client)?;

    info!("Building listening history dataset...");
    datasets::history::run(&config, &client)?;

    info!("All summary tables ready under {:?}", config.results_dir);
    Ok(())
}
