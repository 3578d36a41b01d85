use crate::api::v1::{convert_query_error, ApiError};
use crate::AppData;
use axum::extract::State;
use axum::Json;
use common::types::trip::Trip;
use similarity::search::{search, TripQuery};
use std::sync::Arc;

/// Trips of a region and/or strictly inside a polygon. See [`TripQuery`] for how the two
/// selectors combine.
pub(crate) async fn endpoint(
    State(app_data): State<Arc<AppData>>,
    Json(query): Json<TripQuery>,
) -> Result<Json<Vec<Trip>>, ApiError> {
    let ingestor = app_data.ingestor.lock().await;

    search(ingestor.store(), &query)
        .map(Json)
        .map_err(convert_query_error)
}
