use common::store::{StoreError, TripStore};
use common::util::distance::Distance;
use common::util::logging;
use log::info;
use similarity::bucketing::Buckets;
use similarity::clustering::cluster_buckets;

/// Finds the similarity pairs of all buckets and persists them. Pairs are computed in parallel
/// but written one after another, bucket by bucket.
///
/// Returns the number of persisted pairs.
pub(crate) fn persist_similarities<S: TripStore + ?Sized>(
    store: &mut S,
    buckets: &Buckets,
    threshold: Distance,
) -> Result<usize, StoreError> {
    let pairs = logging::run_with_spinner("ingestion", "Clustering similar trips", || {
        cluster_buckets(buckets, threshold)
    });

    for pair in &pairs {
        store.insert_similarity(*pair)?;
    }
    info!(target: "ingestion", "Persisted {} similarity pairs (threshold {})", pairs.len(), threshold);

    Ok(pairs.len())
}
