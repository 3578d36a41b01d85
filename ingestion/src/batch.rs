use std::fmt;
use std::fmt::Display;
use std::time::Instant;

use common::store::{StoreError, TripStore};
use common::types::errors::{LookupError, ValidationError};
use common::types::trip::{Trip, TripRow};
use common::util::distance::Distance;
use log::info;
use serde::Serialize;
use similarity::bucketing::{bucket_by_minute, Buckets};

use crate::step1_reset::reset;
use crate::step2_load_references::load_references;
use crate::step3_load_trips::load_trips;
use crate::step4_cluster::persist_similarities;

/// Owns a store and runs batches against it. Running a batch requires `&mut self`, so two batches
/// can never work on the same store at the same time.
pub struct Ingestor<S: TripStore> {
    store: S,
    threshold: Distance,
}

impl<S: TripStore> Ingestor<S> {
    pub fn new(store: S, threshold: Distance) -> Self {
        Self { store, threshold }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn threshold(&self) -> Distance {
        self.threshold
    }

    /// Starts a batch without running any of its stages
    pub fn batch<'a>(&'a mut self, rows: &'a [TripRow]) -> Batch<'a, S> {
        Batch::new(&mut self.store, rows, self.threshold)
    }

    /// Replaces everything in the store with the trips of `rows` and their similarity pairs
    pub fn ingest(&mut self, rows: &[TripRow]) -> Result<BatchSummary, IngestError> {
        self.batch(rows).run()
    }
}

/// The stages of a batch, in the order they run. A batch is in the stage it completed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BatchStage {
    Idle,
    Reset,
    ReferenceLoad,
    TripLoad,
    Bucketing,
    Clustering,
    Done,
}

impl Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            BatchStage::Idle => "idle",
            BatchStage::Reset => "reset",
            BatchStage::ReferenceLoad => "reference load",
            BatchStage::TripLoad => "trip load",
            BatchStage::Bucketing => "bucketing",
            BatchStage::Clustering => "clustering",
            BatchStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub regions: usize,
    pub data_sources: usize,
    pub trips: usize,
    pub buckets: usize,
    pub similarity_pairs: usize,
}

/// One ingestion run over a set of rows.
///
/// Stages have to be run in order: reset, load references, load trips, bucket, cluster. There is
/// no rollback, a failing stage leaves the store as it was at the time of the failure.
pub struct Batch<'a, S: TripStore + ?Sized> {
    store: &'a mut S,
    rows: &'a [TripRow],
    threshold: Distance,
    stage: BatchStage,
    trips: Vec<Trip>,
    buckets: Buckets,
    summary: BatchSummary,
}

impl<'a, S: TripStore + ?Sized> Batch<'a, S> {
    pub fn new(store: &'a mut S, rows: &'a [TripRow], threshold: Distance) -> Self {
        Self {
            store,
            rows,
            threshold,
            stage: BatchStage::Idle,
            trips: vec![],
            buckets: Buckets::new(),
            summary: BatchSummary::default(),
        }
    }

    pub fn stage(&self) -> BatchStage {
        self.stage
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    pub fn run(mut self) -> Result<BatchSummary, IngestError> {
        let start_time = Instant::now();
        info!(target: "ingestion", "Starting batch with {} rows", self.rows.len());

        self.reset()?;
        self.load_references()?;
        self.load_trips()?;
        self.bucket()?;
        self.cluster()?;
        let summary = self.finish()?;

        info!(
            target: "ingestion",
            "Batch finished in {:?}: {} trips in {} buckets, {} similarity pairs",
            start_time.elapsed(), summary.trips, summary.buckets, summary.similarity_pairs
        );

        Ok(summary)
    }

    /// Deletes everything a previous batch has persisted
    pub fn reset(&mut self) -> Result<(), IngestError> {
        self.enter(BatchStage::Reset)?;
        reset(&mut *self.store)?;
        self.stage = BatchStage::Reset;
        Ok(())
    }

    pub fn load_references(&mut self) -> Result<(), IngestError> {
        self.enter(BatchStage::ReferenceLoad)?;
        let (regions, data_sources) = load_references(&mut *self.store, self.rows)?;
        self.summary.regions = regions;
        self.summary.data_sources = data_sources;
        self.stage = BatchStage::ReferenceLoad;
        Ok(())
    }

    pub fn load_trips(&mut self) -> Result<(), IngestError> {
        self.enter(BatchStage::TripLoad)?;
        self.trips = load_trips(&mut *self.store, self.rows)?;
        self.summary.trips = self.trips.len();
        self.stage = BatchStage::TripLoad;
        Ok(())
    }

    pub fn bucket(&mut self) -> Result<(), IngestError> {
        self.enter(BatchStage::Bucketing)?;
        self.buckets = bucket_by_minute(std::mem::take(&mut self.trips));
        self.summary.buckets = self.buckets.len();
        info!(target: "ingestion", "Grouped {} trips into {} buckets", self.summary.trips, self.summary.buckets);
        self.stage = BatchStage::Bucketing;
        Ok(())
    }

    pub fn cluster(&mut self) -> Result<(), IngestError> {
        self.enter(BatchStage::Clustering)?;
        self.summary.similarity_pairs = persist_similarities(&mut *self.store, &self.buckets, self.threshold)?;
        self.stage = BatchStage::Clustering;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<BatchSummary, IngestError> {
        self.enter(BatchStage::Done)?;
        self.stage = BatchStage::Done;
        Ok(self.summary.clone())
    }

    // Every stage requires the stage directly before it to be completed
    fn enter(&self, next: BatchStage) -> Result<(), StateError> {
        let required = match next {
            BatchStage::Idle => None,
            BatchStage::Reset => Some(BatchStage::Idle),
            BatchStage::ReferenceLoad => Some(BatchStage::Reset),
            BatchStage::TripLoad => Some(BatchStage::ReferenceLoad),
            BatchStage::Bucketing => Some(BatchStage::TripLoad),
            BatchStage::Clustering => Some(BatchStage::Bucketing),
            BatchStage::Done => Some(BatchStage::Clustering),
        };

        match required {
            Some(required) if required == self.stage => Ok(()),
            _ => Err(StateError { attempted: next, current: self.stage }),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct StateError {
    pub attempted: BatchStage,
    pub current: BatchStage,
}

impl Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cannot start {} while the batch is in stage {}", self.attempted, self.current)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    Validation(#[from] ValidationError),
    Lookup(#[from] LookupError),
    State(#[from] StateError),
    Store(#[from] StoreError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            IngestError::Validation(err) => err,
            IngestError::Lookup(err) => err,
            IngestError::State(err) => err,
            IngestError::Store(err) => err,
        };
        write!(f, "{}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::store::InMemoryStore;
    use common::types::{DataSourceId, RegionId, TripId};
    use crate::tests::{nyc_rows, row};

    fn pair_ids(store: &InMemoryStore) -> Vec<(u32, u32)> {
        store.similarity_pairs().unwrap().iter()
            .map(|p| (p.trip().0, p.similar_trip().0))
            .collect()
    }

    #[test]
    fn test_nyc_batch() {
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance::DEFAULT_SIMILARITY_THRESHOLD);

        let summary = ingestor.ingest(&nyc_rows()).unwrap();

        assert_eq!(summary, BatchSummary {
            regions: 1,
            data_sources: 1,
            trips: 2,
            buckets: 1,
            similarity_pairs: 2,
        });
        let trips = ingestor.store().trips().unwrap();
        assert_eq!(trips.iter().map(|t| t.id).collect::<Vec<_>>(), vec![TripId(1), TripId(2)]);
        assert!(trips.iter().all(|t| t.region == RegionId(1) && t.data_source == DataSourceId(1)));
        assert_eq!(pair_ids(ingestor.store()), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_different_hours_do_not_pair() {
        let rows = vec![
            row("NYC", "40.7,-74.0", "40.8,-74.1", "2023-01-01 09:05:00", "GPS"),
            row("NYC", "40.7,-74.0", "40.8,-74.1", "2023-01-01 10:05:00", "GPS"),
        ];
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance(1_000.0));

        let summary = ingestor.ingest(&rows).unwrap();

        assert_eq!((summary.trips, summary.buckets, summary.similarity_pairs), (2, 2, 0));
    }

    #[test]
    fn test_new_batch_replaces_previous_one() {
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance(1_000.0));
        ingestor.ingest(&nyc_rows()).unwrap();

        let rows = vec![row("Boston", "42.36,-71.06", "42.35,-71.05", "2023-01-02 10:15:00", "cheap_mobile")];
        let summary = ingestor.ingest(&rows).unwrap();

        assert_eq!(summary.trips, 1);
        let store = ingestor.store();
        assert_eq!(store.trips().unwrap().len(), 1);
        assert_eq!(store.trips().unwrap()[0].id, TripId(1));
        assert_eq!(store.find_region("NYC").unwrap(), None);
        assert_eq!(store.find_region("Boston").unwrap(), Some(RegionId(1)));
        assert!(store.similarity_pairs().unwrap().is_empty());
    }

    #[test]
    fn test_stages_out_of_order() {
        let rows = nyc_rows();
        let mut store = InMemoryStore::default();
        let mut batch = Batch::new(&mut store, &rows, Distance(1_000.0));

        assert_eq!(
            batch.load_trips(),
            Err(IngestError::State(StateError { attempted: BatchStage::TripLoad, current: BatchStage::Idle }))
        );
        assert_eq!(
            batch.cluster(),
            Err(IngestError::State(StateError { attempted: BatchStage::Clustering, current: BatchStage::Idle }))
        );

        batch.reset().unwrap();
        batch.load_references().unwrap();
        assert!(matches!(batch.bucket(), Err(IngestError::State(_))));
        assert!(matches!(batch.reset(), Err(IngestError::State(_))));
        batch.load_trips().unwrap();
        batch.bucket().unwrap();
        assert_eq!(batch.buckets().len(), 1);
        batch.cluster().unwrap();
        assert_eq!(batch.finish().unwrap().similarity_pairs, 2);
        assert_eq!(batch.stage(), BatchStage::Done);
        assert!(matches!(batch.finish(), Err(IngestError::State(_))));
    }

    #[test]
    fn test_malformed_row_aborts_batch() {
        let mut rows = nyc_rows();
        rows.push(row("NYC", "40.7;-74.0", "40.8,-74.1", "2023-01-01 09:05:00", "GPS"));
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance(1_000.0));

        assert_eq!(
            ingestor.ingest(&rows),
            Err(IngestError::Validation(ValidationError::MalformedPoint("40.7;-74.0".into())))
        );
        // No rollback: the rows before the broken one stay, but nothing was clustered
        assert_eq!(ingestor.store().trips().unwrap().len(), 2);
        assert!(ingestor.store().similarity_pairs().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_timestamp_aborts_batch() {
        let rows = vec![row("NYC", "40.7,-74.0", "40.8,-74.1", "01/01/2023 09:05", "GPS")];
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance(1_000.0));

        assert_eq!(
            ingestor.ingest(&rows),
            Err(IngestError::Validation(ValidationError::MalformedTimestamp("01/01/2023 09:05".into())))
        );
    }

    #[test]
    fn test_empty_batch() {
        let mut ingestor = Ingestor::new(InMemoryStore::default(), Distance(1_000.0));

        assert_eq!(ingestor.ingest(&[]).unwrap(), BatchSummary::default());
    }
}
