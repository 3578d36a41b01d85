use std::path::Path;
use std::time::Instant;

use common::store::{InMemoryStore, TripStore};
use common::types::config::Config;
use common::util::df::{similarity_frame, trips_frame, write_csv};
use common::util::logging;
use ingestion::trip_file::read_trip_file;
use ingestion::{BatchSummary, Ingestor};
use log::info;

use crate::TripsimError;

/// Runs a single batch over a trip file. If `output` is given, the resulting trips and similarity
/// pairs are written to `trips.csv` and `similar_trips.csv` in that directory.
pub fn ingest_file(file: &Path, output: Option<&Path>, config: &Config) -> Result<BatchSummary, TripsimError> {
    info!(target: "ingestion", "Starting ingestion of {:?}", file);
    let start_time = Instant::now();

    let rows = logging::run_with_spinner("ingestion", "Reading trip file", || read_trip_file(file))?;

    let mut ingestor = Ingestor::new(InMemoryStore::default(), config.similarity().threshold);
    let summary = ingestor.ingest(&rows)?;

    if let Some(output) = output {
        export(ingestor.store(), output)?;
    }

    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: "ingestion", "Ingestion finished in {}", elapsed);

    Ok(summary)
}

fn export(store: &InMemoryStore, output: &Path) -> Result<(), TripsimError> {
    logging::run_with_spinner("ingestion", "Exporting trips and similarity pairs", || {
        write_csv(output.join("trips.csv"), trips_frame(&store.trips()?)?)?;
        write_csv(output.join("similar_trips.csv"), similarity_frame(&store.similarity_pairs()?)?)?;
        Ok::<(), TripsimError>(())
    })
}
