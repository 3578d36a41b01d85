pub mod bootstrap_config;
mod config;
mod ingest;

use crate::config::load_config;
use bootstrap_config::{BootstrapConfig, Command};
use common::store::{InMemoryStore, StoreError};
use common::util::logging;
use ingestion::trip_file::ReadError;
use ingestion::{IngestError, Ingestor};
use log::{error, info, SetLoggerError};
use polars::error::PolarsError;
use std::fmt::{Display, Formatter};
use tokio::signal;

#[tokio::main]
async fn main() {
    let _ = run()
        .await
        .inspect_err(|err| error!(target: "main", "{}", err));
}

async fn run() -> Result<(), TripsimError> {
    let bootstrap_config = BootstrapConfig::read();

    logging::init(bootstrap_config.log_level.clone().into())?;
    print_startup_message();

    let config = load_config(&bootstrap_config)?;

    match bootstrap_config.command {
        Command::Ingest { file, output } => {
            let summary = ingest::ingest_file(&file, output.as_deref(), &config)?;
            info!(
                target: "main",
                "Ingested {} trips from {} regions and {} data sources into {} buckets, found {} similarity pairs",
                summary.trips, summary.regions, summary.data_sources, summary.buckets, summary.similarity_pairs
            );
        }
        Command::Serve => {
            let ingestor = Ingestor::new(InMemoryStore::default(), config.similarity().threshold);
            let (listener, app) = server::build(ingestor, config.server()).await?;

            info!(target: "main", "Listening on {}", listener.local_addr()?);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!(target: "main", "API server stopped");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!(target: "main", "Received shutdown signal"),
        Err(err) => error!(target: "main", "Unable to listen for shutdown signal: {}", err),
    }
}

fn print_startup_message() {
    info!("\n  _        _           _           \n | |_ _ __(_)_ __  ___(_)_ __ ___  \n | __| '__| | '_ \\/ __| | '_ ` _ \\ \n | |_| |  | | |_) \\__ \\ | | | | | |\n  \\__|_|  |_| .__/|___/_|_| |_| |_|\n            |_|                    \n T R I P   S I M I L A R I T Y\n");
}

#[derive(thiserror::Error, Debug)]
pub enum TripsimError {
    Logger(#[from] SetLoggerError),
    Config(#[from] config::ConfigError),
    Read(#[from] ReadError),
    Ingest(#[from] IngestError),
    Store(#[from] StoreError),
    Polars(#[from] PolarsError),
    IO(#[from] std::io::Error),
    Server(#[from] server::ServerError),
}

impl Display for TripsimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            TripsimError::Logger(err) => err,
            TripsimError::Config(err) => err,
            TripsimError::Read(err) => err,
            TripsimError::Ingest(err) => err,
            TripsimError::Store(err) => err,
            TripsimError::Polars(err) => err,
            TripsimError::IO(err) => err,
            TripsimError::Server(err) => err,
        };
        let prefix = match self {
            TripsimError::Logger(_) => "Setting up logging",
            TripsimError::Config(_) => "Reading config file",
            TripsimError::Read(_) => "Reading trip file",
            TripsimError::Ingest(_) => "Ingesting trips",
            TripsimError::Store(_) => "Reading from store",
            TripsimError::Polars(_) => "Exporting trip data",
            TripsimError::IO(_) => "Error during IO",
            TripsimError::Server(_) => "Error in server",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
