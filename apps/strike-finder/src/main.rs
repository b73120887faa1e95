//! Strike Finder Binary
//!
//! One-shot option lookups on the command line, or the same operations as a
//! JSON API with `serve`.
//!
//! # Usage
//!
//! ```bash
//! strike-finder delta-strike --ticker NFLX --expiry 2026-02-13 --target-delta -0.20
//! strike-finder covered-call --ticker NFLX --expiry 2026-02-13 --shares 200
//! strike-finder serve --port 8080
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)
//! - Any `${VAR}` referenced from the config file; `.env` is loaded first.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;

use strike_finder::application::services::OptionsDeskService;
use strike_finder::cli::{self, Cli, Command, ServeArgs};
use strike_finder::config::{Config, load_config};
use strike_finder::infrastructure::http::{AppState, create_router};
use strike_finder::infrastructure::nasdaq::{self, NasdaqAdapter};
use strike_finder::infrastructure::upstream::UpstreamHttpClient;
use strike_finder::infrastructure::yahoo::{self, YahooChartAdapter};
use strike_finder::observability::init_metrics;

/// Options desk wired to the live providers.
type Desk = OptionsDeskService<NasdaqAdapter, YahooChartAdapter>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config)?;

    let desk = create_desk(&config)?;

    match cli.command {
        Command::Query(query) => {
            let output = cli::execute(&desk, query, cli.json).await?;
            println!("{}", output.trim_end());
            Ok(())
        }
        Command::Serve(args) => serve(&config, args, desk).await,
    }
}

/// Load `.env` from the current or an ancestor directory, if there is one.
fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Initialize the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(&config.observability.logging.level)
            .with_context(|| {
                format!(
                    "invalid observability.logging.level '{}'",
                    config.observability.logging.level
                )
            })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Build the upstream adapters and the options desk.
fn create_desk(config: &Config) -> anyhow::Result<Desk> {
    let upstream = &config.upstream;

    let nasdaq_client = UpstreamHttpClient::new(
        nasdaq::PROVIDER,
        upstream.timeout(),
        &upstream.user_agent,
    )?;
    let yahoo_client =
        UpstreamHttpClient::new(yahoo::PROVIDER, upstream.timeout(), &upstream.user_agent)?;

    let chain = NasdaqAdapter::new(nasdaq_client, upstream.nasdaq_base_url.clone());
    let history = YahooChartAdapter::new(yahoo_client, upstream.yahoo_base_url.clone());

    tracing::debug!(
        nasdaq = %upstream.nasdaq_base_url,
        yahoo = %upstream.yahoo_base_url,
        timeout_secs = upstream.timeout_secs,
        delta_tolerance = %config.interpolation.delta_tolerance,
        "Upstream adapters initialized"
    );

    Ok(OptionsDeskService::new(
        chain,
        history,
        config.interpolation.interpolator(),
    ))
}

/// Run the HTTP API until SIGINT or SIGTERM.
async fn serve(config: &Config, args: ServeArgs, desk: Desk) -> anyhow::Result<()> {
    let metrics = &config.observability.metrics;
    if metrics.enabled {
        init_metrics(&metrics.exporter_config()?)?;
    }

    let bind = args.bind.unwrap_or_else(|| config.server.bind_address.clone());
    let port = args.port.unwrap_or(config.server.http_port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address '{bind}:{port}'"))?;

    let app = create_router(AppState {
        desk: Arc::new(desk),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /price");
    tracing::info!("  GET  /delta-strike");
    tracing::info!("  GET  /strike-premium");
    tracing::info!("  GET  /put-premium");
    tracing::info!("  GET  /option-premium");
    tracing::info!("  GET  /covered-call");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
