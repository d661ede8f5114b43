//! ircview
//!
//! Follows a channel log server and prints its transcript to stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ircview::config::{generate_default_config, Config, LoggingConfig};
use ircview::{Dispatcher, DisplayZone, HttpTransport, TerminalView, Viewer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ircview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live transcript viewer for an IRC log server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log server base URL
    #[arg(short, long)]
    pub server: Option<String>,

    /// Delay between polls in milliseconds
    #[arg(short, long)]
    pub poll_interval_ms: Option<u64>,

    /// Show times in UTC instead of local time
    #[arg(long)]
    pub utc: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { output }) = cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => std::fs::write(&path, content)
                .with_context(|| format!("writing config to {:?}", path))?,
            None => print!("{}", content),
        }
        return Ok(());
    }

    // Overrides apply file < environment < command line; validate once at the end
    let config_path = cli.config.clone().or_else(Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    if let Some(server) = cli.server {
        config.server.url = server;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.viewer.poll_interval_ms = interval;
    }
    if cli.utc {
        config.viewer.utc = true;
    }
    config.validate()?;

    init_logging(&config.logging);

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!(
        server = %config.server.url,
        interval_ms = config.viewer.poll_interval_ms,
        "ircview v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = HttpTransport::new(config.server.transport_config())
        .context("building HTTP client")?;

    let zone = if config.viewer.utc {
        DisplayZone::Utc
    } else {
        DisplayZone::Local
    };
    let dispatcher = Dispatcher::with_zone(TerminalView::stdout(), zone);

    let viewer = Viewer::new(
        Arc::new(transport),
        dispatcher,
        config.viewer.viewer_config(),
    )?;

    viewer
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}

/// Install the tracing subscriber; logs go to stderr, the transcript to stdout
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("ircview={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
