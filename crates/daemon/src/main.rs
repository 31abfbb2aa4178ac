#![forbid(unsafe_code)]

//! Signage data service: serves and replaces the shared dataset file.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod http;
mod store;

use crate::store::DataStore;

#[derive(Parser, Debug)]
#[command(name = "signage-daemon")]
struct Args {
    /// Listen address, e.g. 127.0.0.1:3001
    #[arg(long, default_value = "127.0.0.1:3001")]
    listen: SocketAddr,

    /// JSON file holding the dataset.
    #[arg(long, default_value = "data.json")]
    data_file: PathBuf,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(DataStore::new(args.data_file.clone()));
    let app = http::router(store);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    tracing::info!(listen = %args.listen, data_file = %args.data_file.display(), "daemon starting");
    axum::serve(listener, app).await?;
    Ok(())
}
