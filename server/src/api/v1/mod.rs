pub(crate) mod regions;
pub(crate) mod search;
pub(crate) mod trips;

use axum::http::StatusCode;
use common::store::StoreError;
use ingestion::IngestError;
use similarity::search::QueryError;

pub(crate) type ApiError = (StatusCode, String);

pub(crate) fn store_error(err: StoreError) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub(crate) fn convert_query_error(err: QueryError) -> ApiError {
    match err {
        QueryError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        QueryError::MissingSelector => (StatusCode::BAD_REQUEST, QueryError::MissingSelector.to_string()),
        QueryError::Lookup(e) => (StatusCode::NOT_FOUND, e.to_string()),
        QueryError::Store(e) => store_error(e),
    }
}

pub(crate) fn convert_ingest_error(err: IngestError) -> ApiError {
    match err {
        IngestError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        IngestError::Lookup(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        IngestError::State(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        IngestError::Store(e) => store_error(e),
    }
}
