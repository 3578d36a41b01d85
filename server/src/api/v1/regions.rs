use crate::api::v1::{store_error, ApiError};
use crate::AppData;
use axum::extract::State;
use axum::Json;
use common::store::TripStore;
use common::types::trip::Region;
use std::sync::Arc;

pub(crate) async fn list(
    State(app_data): State<Arc<AppData>>,
) -> Result<Json<Vec<Region>>, ApiError> {
    let ingestor = app_data.ingestor.lock().await;

    ingestor.store().regions()
        .map(Json)
        .map_err(store_error)
}
