#![forbid(unsafe_code)]

//! Signage display: rotates the wall's screens from the shared dataset.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use signage_core::refresh::RefreshPolicy;
use signage_core::rotation::Timings;
use tokio::sync::watch;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use signage_display::{CardLayout, Engine, EngineConfig, HttpDatasetSource, LogPresenter};

#[derive(Debug, Parser)]
#[command(name = "signage-display", version, about = "Unattended signage display engine")]
struct Cli {
    /// Dataset endpoint of the data service.
    #[arg(long, default_value = "http://127.0.0.1:3001/api/data")]
    data_url: String,

    /// Display identifier for logs. If omitted, a random UUID is used.
    #[arg(long)]
    display_id: Option<String>,

    /// Dwell time per screen when no marquee applies.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    dwell_seconds: u64,

    /// Background poll interval.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    poll_seconds: u64,

    /// Delay before retrying a failed initial load.
    #[arg(long, default_value_t = 5)]
    retry_seconds: u64,

    /// Height of the notices viewport in px. Unset disables the marquee.
    #[arg(long)]
    viewport_height: Option<f64>,

    /// Height of one notice card in px.
    #[arg(long, default_value_t = 280.0)]
    card_height: f64,

    /// Gap between notice cards in px.
    #[arg(long, default_value_t = 16.0)]
    card_gap: f64,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let display_id = cli
        .display_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let config = EngineConfig {
        timings: Timings {
            dwell: Duration::from_secs(cli.dwell_seconds),
            ..Default::default()
        },
        refresh: RefreshPolicy {
            poll_interval: Duration::from_secs(cli.poll_seconds),
            initial_retry: Duration::from_secs(cli.retry_seconds),
        },
    };
    let presenter = LogPresenter::new(CardLayout {
        viewport_height: cli.viewport_height,
        card_height: cli.card_height,
        card_gap: cli.card_gap,
    });
    let source = HttpDatasetSource::new(Client::new(), cli.data_url.clone());
    let engine = Engine::new(source, presenter, config);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    info!(%display_id, data_url = %cli.data_url, "display starting");
    engine
        .run(stop_rx)
        .instrument(info_span!("display", id = %display_id))
        .await;
    Ok(())
}
