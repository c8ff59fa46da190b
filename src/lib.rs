pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(&config)?;

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if command.needs_valid_config() {
        config.validate()?;
    }

    match command {
        Commands::Serve => {
            let prometheus_handle = if config.observability.metrics_enabled {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install Prometheus recorder")?;
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            } else {
                None
            };
            run_serve(config, prometheus_handle).await
        }
        Commands::Search { query } => {
            let query = query.join(" ");
            cli::commands::cmd_search(&config, &query).await
        }
        Commands::Trending { limit } => cli::commands::cmd_trending(&config, limit).await,
        Commands::Browse => cli::commands::cmd_browse(&config).await,
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("Created config.toml with default settings.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
    .context("Failed to initialize tracing")
}

async fn run_serve(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Reelscout v{} starting...", env!("CARGO_PKG_VERSION"));

    if !config.server.enabled {
        anyhow::bail!("server.enabled is false; nothing to serve");
    }

    let port = config.server.port;
    let shared = Arc::new(state::SharedState::new(config).await?);
    let api_state = api::create_app_state(Arc::clone(&shared), prometheus_handle);

    let app = api::router(api_state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web Server running at http://0.0.0.0:{}", port);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Error listening for shutdown: {}", e),
        }
    });

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
    }

    info!("Server stopped");
    Ok(())
}
