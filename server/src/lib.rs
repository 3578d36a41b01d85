mod api;

use axum::routing::{get, post};
use axum::Router;
use common::store::InMemoryStore;
use common::types::config::ServerConfig;
use ingestion::Ingestor;
use std::fmt::Display;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

type STORE = InMemoryStore;

/// Batches and queries share one ingestor. The lock serializes them, so a query never observes a
/// batch halfway through and two batches never reset the store under each other. Batches take an
/// owned guard into a blocking task, hence the `Arc`.
pub(crate) struct AppData {
    ingestor: Arc<Mutex<Ingestor<STORE>>>,
}

pub fn router(ingestor: Ingestor<STORE>) -> Router {
    let app_data = Arc::new(AppData { ingestor: Arc::new(Mutex::new(ingestor)) });

    Router::new()
        .route("/api/v1/trips", post(api::v1::trips::ingest))
        .route("/api/v1/trips/search", post(api::v1::search::endpoint))
        .route("/api/v1/trips/{id}/similar", get(api::v1::trips::similar))
        .route("/api/v1/regions", get(api::v1::regions::list))
        .with_state(app_data)
}

pub async fn build(
    ingestor: Ingestor<STORE>,
    config: &ServerConfig,
) -> Result<(TcpListener, Router), ServerError> {
    let app = router(ingestor);

    let listener = TcpListener::bind(&config.address).await?;

    Ok((listener, app))
}

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    Io(#[from] std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Io(err) => write!(f, "{}", err),
        }
    }
}
