use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;

use chrono::{NaiveDateTime, Timelike};
use common::types::trip::Trip;

/// The minute of the day a trip started in. Date and seconds are dropped, so trips from different
/// days end up in the same bucket.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct BucketKey {
    pub hour: u32,
    pub minute: u32,
}

impl BucketKey {
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            hour: timestamp.hour(),
            minute: timestamp.minute(),
        }
    }
}

// Not zero-padded: 09:05 is "9:5"
impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hour, self.minute)
    }
}

pub type Buckets = BTreeMap<BucketKey, Vec<Trip>>;

/// Groups trips by the minute of the day they started in. Within a bucket, trips keep the order in
/// which they were given.
pub fn bucket_by_minute<I>(trips: I) -> Buckets
where
    I: IntoIterator<Item = Trip>,
{
    trips.into_iter().fold(Buckets::new(), |mut buckets, trip| {
        buckets.entry(BucketKey::of(&trip.timestamp)).or_default().push(trip);
        buckets
    })
}
