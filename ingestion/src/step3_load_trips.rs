use common::store::TripStore;
use common::types::errors::LookupError;
use common::types::point::Point;
use common::types::trip::{parse_timestamp, NewTrip, Trip, TripRow};
use common::util::logging;

use crate::batch::IngestError;

/// Persists one trip per row, in the order of the rows. Region and data source names are resolved
/// through the store, so references have to be loaded first.
///
/// Returns the persisted trips, in the same order.
pub(crate) fn load_trips<S: TripStore + ?Sized>(
    store: &mut S,
    rows: &[TripRow],
) -> Result<Vec<Trip>, IngestError> {
    logging::run_with_pb("ingestion", "Loading trips", rows.len() as u64, true, |pb| {
        rows.iter()
            .map(|row| -> Result<Trip, IngestError> {
                let new_trip = parse_row(&*store, row)?;
                let trip = store.insert_trip(new_trip)?;
                pb.inc(1);
                Ok(trip)
            })
            .collect()
    })
}

fn parse_row<S: TripStore + ?Sized>(store: &S, row: &TripRow) -> Result<NewTrip, IngestError> {
    let timestamp = parse_timestamp(&row.timestamp)?;
    let origin = row.origin.parse::<Point>()?;
    let destination = row.destination.parse::<Point>()?;

    let region = store.find_region(&row.region)?
        .ok_or_else(|| LookupError::Region(row.region.clone()))?;
    let data_source = store.find_data_source(&row.data_source)?
        .ok_or_else(|| LookupError::DataSource(row.data_source.clone()))?;

    Ok(NewTrip { origin, destination, timestamp, region, data_source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{nyc_rows, row};
    use common::store::InMemoryStore;
    use common::types::TripId;

    #[test]
    fn test_trips_keep_row_order() {
        let mut store = InMemoryStore::default();
        store.insert_region("NYC").unwrap();
        store.insert_data_source("GPS").unwrap();

        let trips = load_trips(&mut store, &nyc_rows()).unwrap();

        assert_eq!(trips.iter().map(|t| t.id).collect::<Vec<_>>(), vec![TripId(1), TripId(2)]);
        assert_eq!(trips[0].origin, Point::new(40.7, -74.0));
        assert_eq!(trips[1].destination, Point::new(40.81, -74.11));
        assert_eq!(store.trips().unwrap(), trips);
    }

    #[test]
    fn test_unknown_reference_is_a_lookup_error() {
        let mut store = InMemoryStore::default();
        store.insert_region("NYC").unwrap();

        let result = load_trips(&mut store, &nyc_rows());
        assert_eq!(result, Err(IngestError::Lookup(LookupError::DataSource("GPS".into()))));

        store.insert_data_source("GPS").unwrap();
        let rows = vec![row("Boston", "1,1", "2,2", "2023-01-01 09:05:00", "GPS")];
        let result = load_trips(&mut store, &rows);
        assert_eq!(result, Err(IngestError::Lookup(LookupError::Region("Boston".into()))));
    }
}
