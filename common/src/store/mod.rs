pub mod memory;

use std::fmt;
use std::fmt::Display;

use crate::types::trip::{DataSource, NewTrip, Region, SimilarityPair, Trip};
use crate::types::{DataSourceId, RegionId, TripId};

pub use memory::InMemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence of trips, their reference records and similarity pairs.
///
/// Ids are assigned by the store on insertion. Every write is visible to subsequent reads
/// immediately, i.e. there is no explicit commit.
pub trait TripStore {
    /// Deletes all similarity pairs, trips, data sources and regions
    fn reset(&mut self) -> StoreResult<()>;

    // Names are unique. Inserting a name twice is an error.
    fn insert_region(&mut self, name: &str) -> StoreResult<RegionId>;
    fn insert_data_source(&mut self, name: &str) -> StoreResult<DataSourceId>;

    fn find_region(&self, name: &str) -> StoreResult<Option<RegionId>>;
    fn find_data_source(&self, name: &str) -> StoreResult<Option<DataSourceId>>;

    fn insert_trip(&mut self, trip: NewTrip) -> StoreResult<Trip>;
    fn insert_similarity(&mut self, pair: SimilarityPair) -> StoreResult<()>;

    fn regions(&self) -> StoreResult<Vec<Region>>;
    fn data_sources(&self) -> StoreResult<Vec<DataSource>>;
    /// All trips in insertion order
    fn trips(&self) -> StoreResult<Vec<Trip>>;
    fn trips_in_region(&self, region: RegionId) -> StoreResult<Vec<Trip>>;
    fn trip(&self, id: TripId) -> StoreResult<Option<Trip>>;
    fn similarity_pairs(&self) -> StoreResult<Vec<SimilarityPair>>;
    /// Ids of all trips that `id` was recorded as similar to
    fn similar_to(&self, id: TripId) -> StoreResult<Vec<TripId>>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    DuplicateRegion(String),
    DuplicateDataSource(String),
    UnknownRegion(RegionId),
    UnknownDataSource(DataSourceId),
    UnknownTrip(TripId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::DuplicateRegion(name) => write!(f, "Region '{name}' already exists"),
            StoreError::DuplicateDataSource(name) => write!(f, "Data source '{name}' already exists"),
            StoreError::UnknownRegion(id) => write!(f, "No region with id {id}"),
            StoreError::UnknownDataSource(id) => write!(f, "No data source with id {id}"),
            StoreError::UnknownTrip(id) => write!(f, "No trip with id {id}"),
        }
    }
}
