use hashbrown::HashMap;
use log::debug;

use crate::store::{StoreError, StoreResult, TripStore};
use crate::types::trip::{DataSource, NewTrip, Region, SimilarityPair, Trip};
use crate::types::{DataSourceId, RegionId, TripId};

/// A store that keeps everything in memory. Ids are continuous: the record with id `n` is found at
/// index `n - 1`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    regions: Vec<Region>,
    region_ids: HashMap<String, RegionId>,
    data_sources: Vec<DataSource>,
    data_source_ids: HashMap<String, DataSourceId>,
    trips: Vec<Trip>,
    pairs: Vec<SimilarityPair>,
}

// Converts a length into the id the next record will get
fn next_id(len: usize) -> u32 {
    len as u32 + 1
}

fn index_of(id: u32) -> usize {
    (id as usize).wrapping_sub(1)
}

impl InMemoryStore {
    fn contains_trip(&self, id: TripId) -> bool {
        self.trips.get(index_of(id.0)).is_some()
    }
}

impl TripStore for InMemoryStore {
    fn reset(&mut self) -> StoreResult<()> {
        debug!(
            target: "store",
            "Deleting {} similarity pairs, {} trips, {} data sources and {} regions",
            self.pairs.len(), self.trips.len(), self.data_sources.len(), self.regions.len()
        );
        self.pairs.clear();
        self.trips.clear();
        self.data_sources.clear();
        self.data_source_ids.clear();
        self.regions.clear();
        self.region_ids.clear();
        Ok(())
    }

    fn insert_region(&mut self, name: &str) -> StoreResult<RegionId> {
        if self.region_ids.contains_key(name) {
            return Err(StoreError::DuplicateRegion(name.to_string()));
        }
        let id = RegionId(next_id(self.regions.len()));
        self.regions.push(Region { id, name: name.to_string() });
        self.region_ids.insert(name.to_string(), id);
        Ok(id)
    }

    fn insert_data_source(&mut self, name: &str) -> StoreResult<DataSourceId> {
        if self.data_source_ids.contains_key(name) {
            return Err(StoreError::DuplicateDataSource(name.to_string()));
        }
        let id = DataSourceId(next_id(self.data_sources.len()));
        self.data_sources.push(DataSource { id, name: name.to_string() });
        self.data_source_ids.insert(name.to_string(), id);
        Ok(id)
    }

    fn find_region(&self, name: &str) -> StoreResult<Option<RegionId>> {
        Ok(self.region_ids.get(name).copied())
    }

    fn find_data_source(&self, name: &str) -> StoreResult<Option<DataSourceId>> {
        Ok(self.data_source_ids.get(name).copied())
    }

    fn insert_trip(&mut self, trip: NewTrip) -> StoreResult<Trip> {
        if self.regions.get(index_of(trip.region.0)).is_none() {
            return Err(StoreError::UnknownRegion(trip.region));
        }
        if self.data_sources.get(index_of(trip.data_source.0)).is_none() {
            return Err(StoreError::UnknownDataSource(trip.data_source));
        }

        let trip = trip.with_id(TripId(next_id(self.trips.len())));
        self.trips.push(trip.clone());
        Ok(trip)
    }

    fn insert_similarity(&mut self, pair: SimilarityPair) -> StoreResult<()> {
        for id in [pair.trip(), pair.similar_trip()] {
            if !self.contains_trip(id) {
                return Err(StoreError::UnknownTrip(id));
            }
        }
        self.pairs.push(pair);
        Ok(())
    }

    fn regions(&self) -> StoreResult<Vec<Region>> {
        Ok(self.regions.clone())
    }

    fn data_sources(&self) -> StoreResult<Vec<DataSource>> {
        Ok(self.data_sources.clone())
    }

    fn trips(&self) -> StoreResult<Vec<Trip>> {
        Ok(self.trips.clone())
    }

    fn trips_in_region(&self, region: RegionId) -> StoreResult<Vec<Trip>> {
        Ok(self.trips.iter()
            .filter(|trip| trip.region == region)
            .cloned()
            .collect())
    }

    fn trip(&self, id: TripId) -> StoreResult<Option<Trip>> {
        Ok(self.trips.get(index_of(id.0)).cloned())
    }

    fn similarity_pairs(&self) -> StoreResult<Vec<SimilarityPair>> {
        Ok(self.pairs.clone())
    }

    fn similar_to(&self, id: TripId) -> StoreResult<Vec<TripId>> {
        Ok(self.pairs.iter()
            .filter(|pair| pair.trip() == id)
            .map(|pair| pair.similar_trip())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::point::Point;
    use crate::types::trip::parse_timestamp;

    fn new_trip(region: RegionId, data_source: DataSourceId) -> NewTrip {
        NewTrip {
            origin: Point::new(40.7, -74.0),
            destination: Point::new(40.8, -74.1),
            timestamp: parse_timestamp("2023-01-01 09:05:00").unwrap(),
            region,
            data_source,
        }
    }

    #[test]
    fn test_reference_records() {
        let mut store = InMemoryStore::default();

        let nyc = store.insert_region("NYC").unwrap();
        let boston = store.insert_region("Boston").unwrap();
        assert_eq!((nyc, boston), (RegionId(1), RegionId(2)));
        assert_eq!(store.insert_region("NYC"), Err(StoreError::DuplicateRegion("NYC".into())));
        assert_eq!(store.find_region("Boston").unwrap(), Some(boston));
        assert_eq!(store.find_region("Paris").unwrap(), None);

        let gps = store.insert_data_source("GPS").unwrap();
        assert_eq!(gps, DataSourceId(1));
        assert_eq!(store.find_data_source("GPS").unwrap(), Some(gps));
        assert_eq!(store.data_sources().unwrap(), vec![DataSource { id: gps, name: "GPS".into() }]);
    }

    #[test]
    fn test_trips_and_pairs() {
        let mut store = InMemoryStore::default();
        let nyc = store.insert_region("NYC").unwrap();
        let boston = store.insert_region("Boston").unwrap();
        let gps = store.insert_data_source("GPS").unwrap();

        let first = store.insert_trip(new_trip(nyc, gps)).unwrap();
        let second = store.insert_trip(new_trip(boston, gps)).unwrap();
        assert_eq!((first.id, second.id), (TripId(1), TripId(2)));
        assert_eq!(store.trip(TripId(2)).unwrap(), Some(second.clone()));
        assert_eq!(store.trip(TripId(0)).unwrap(), None);
        assert_eq!(store.trips_in_region(nyc).unwrap(), vec![first.clone()]);

        assert_eq!(
            store.insert_trip(new_trip(RegionId(9), gps)),
            Err(StoreError::UnknownRegion(RegionId(9)))
        );

        store.insert_similarity(SimilarityPair::new(first.id, second.id).unwrap()).unwrap();
        assert_eq!(
            store.insert_similarity(SimilarityPair::new(first.id, TripId(3)).unwrap()),
            Err(StoreError::UnknownTrip(TripId(3)))
        );
        assert_eq!(store.similar_to(first.id).unwrap(), vec![second.id]);
        assert!(store.similar_to(second.id).unwrap().is_empty());
    }

    #[test]
    fn test_reset_restarts_ids() {
        let mut store = InMemoryStore::default();
        let nyc = store.insert_region("NYC").unwrap();
        let gps = store.insert_data_source("GPS").unwrap();
        store.insert_trip(new_trip(nyc, gps)).unwrap();

        store.reset().unwrap();

        assert!(store.regions().unwrap().is_empty());
        assert!(store.data_sources().unwrap().is_empty());
        assert!(store.trips().unwrap().is_empty());
        assert!(store.similarity_pairs().unwrap().is_empty());
        assert_eq!(store.find_region("NYC").unwrap(), None);
        assert_eq!(store.insert_region("NYC").unwrap(), RegionId(1));
    }
}
