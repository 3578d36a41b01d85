use crate::api::v1::{convert_ingest_error, store_error, ApiError};
use crate::AppData;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::store::TripStore;
use common::types::errors::LookupError;
use common::types::TripId;
use ingestion::trip_file::parse_trip_csv;
use ingestion::BatchSummary;
use log::info;
use std::sync::Arc;

/// Replaces all trips with the ones of the CSV file sent as request body.
///
/// The batch runs on the blocking thread pool while holding the lock, so queries wait for it to
/// finish without stalling the runtime.
pub(crate) async fn ingest(
    State(app_data): State<Arc<AppData>>,
    body: String,
) -> Result<Json<BatchSummary>, ApiError> {
    let rows = parse_trip_csv(&body)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    info!(target: "server", "Received trip file with {} rows", rows.len());

    let mut ingestor = app_data.ingestor.clone().lock_owned().await;

    tokio::task::spawn_blocking(move || ingestor.ingest(&rows))
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?
        .map(Json)
        .map_err(convert_ingest_error)
}

pub(crate) async fn similar(
    State(app_data): State<Arc<AppData>>,
    Path(id): Path<u32>,
) -> Result<Json<Vec<TripId>>, ApiError> {
    let ingestor = app_data.ingestor.lock().await;
    let store = ingestor.store();
    let id = TripId(id);

    if store.trip(id).map_err(store_error)?.is_none() {
        return Err((StatusCode::NOT_FOUND, LookupError::Trip(id).to_string()));
    }

    store.similar_to(id)
        .map(Json)
        .map_err(store_error)
}
