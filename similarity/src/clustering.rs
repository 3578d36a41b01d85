use common::types::trip::{SimilarityPair, Trip};
use common::util::distance::Distance;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::bucketing::Buckets;
use crate::haversine::distance;

/// Finds the similarity pairs of a single temporal bucket.
///
/// The cluster is anchored at the first trip of the bucket: the origin cluster contains every trip
/// whose origin is within `threshold` of the first trip's origin. The final cluster contains every
/// member of the origin cluster whose destination is within `threshold` of the destination of the
/// origin cluster's first member. Both bounds are inclusive.
///
/// Every trip of the bucket is then paired with every member of the final cluster except itself.
/// The cluster does not depend on the trip being paired, so a trip far away from the anchor is
/// still recorded as similar to the cluster members.
pub fn cluster_bucket(trips: &[Trip], threshold: Distance) -> Vec<SimilarityPair> {
    let final_cluster = anchored_cluster(trips, threshold);

    trips.iter()
        .flat_map(|trip| {
            final_cluster.iter()
                .filter_map(move |similar| SimilarityPair::new(trip.id, similar.id))
        })
        .collect()
}

fn anchored_cluster(trips: &[Trip], threshold: Distance) -> Vec<&Trip> {
    let Some(origin_reference) = trips.first() else {
        return vec![];
    };

    let origin_cluster = trips.iter()
        .filter(|trip| distance(&trip.origin, &origin_reference.origin) <= threshold.kilometers())
        .collect_vec();

    // Only empty if the threshold is negative or the anchor has non-finite coordinates
    let Some(destination_reference) = origin_cluster.first() else {
        return vec![];
    };

    origin_cluster.iter()
        .filter(|trip| {
            distance(&trip.destination, &destination_reference.destination) <= threshold.kilometers()
        })
        .copied()
        .collect_vec()
}

/// Finds the similarity pairs of all buckets. Buckets are independent of each other, so they are
/// processed in parallel. The result is ordered by bucket, and within a bucket in the order
/// `cluster_bucket` emits the pairs.
pub fn cluster_buckets(buckets: &Buckets, threshold: Distance) -> Vec<SimilarityPair> {
    let buckets = buckets.iter().collect_vec();

    buckets.par_iter()
        .map(|(key, trips)| {
            let pairs = cluster_bucket(trips, threshold);
            debug!(target: "similarity", "Bucket {} with {} trips yields {} pairs", key, trips.len(), pairs.len());
            pairs
        })
        .collect::<Vec<Vec<SimilarityPair>>>()
        .concat()
}
