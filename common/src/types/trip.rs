use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::errors::ValidationError;
use crate::types::point::Point;
use crate::types::{DataSourceId, RegionId, TripId};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The number of columns of a trip file row: region, origin, destination, timestamp, data source
pub const TRIP_ROW_COLUMNS: usize = 5;

/// One unparsed row of a trip file. Points and the timestamp are kept as text and only parsed
/// when the trip is loaded, so a malformed value fails the batch at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRow {
    pub region: String,
    pub origin: String,
    pub destination: String,
    pub timestamp: String,
    pub data_source: String,
}

impl TripRow {
    /// Turns raw records into rows. The first record is the header of the file and is skipped.
    pub fn from_records<I>(records: I) -> Result<Vec<TripRow>, ValidationError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        records.into_iter()
            .enumerate()
            .skip(1)
            .map(|(index, record)| {
                let found = record.len();
                let [region, origin, destination, timestamp, data_source]: [String; TRIP_ROW_COLUMNS] =
                    record.try_into()
                        .map_err(|_| ValidationError::WrongColumnCount { row: index + 1, found })?;

                Ok(TripRow { region, origin, destination, timestamp, data_source })
            })
            .collect()
    }
}

pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| ValidationError::MalformedTimestamp(text.to_string()))
}

/// A trip that has not been persisted yet and therefore has no id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub origin: Point,
    pub destination: Point,
    pub timestamp: NaiveDateTime,
    pub region: RegionId,
    pub data_source: DataSourceId,
}

impl NewTrip {
    pub fn with_id(self, id: TripId) -> Trip {
        Trip {
            id,
            origin: self.origin,
            destination: self.destination,
            timestamp: self.timestamp,
            region: self.region,
            data_source: self.data_source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub origin: Point,
    pub destination: Point,
    pub timestamp: NaiveDateTime,
    pub region: RegionId,
    pub data_source: DataSourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: DataSourceId,
    pub name: String,
}

/// States that `trip` is similar to `similar_trip`. The relation is directed: the reverse pair is
/// a separate record. A trip is never similar to itself.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub struct SimilarityPair {
    trip: TripId,
    similar_trip: TripId,
}

impl SimilarityPair {
    /// Returns `None` if both ids are the same
    pub fn new(trip: TripId, similar_trip: TripId) -> Option<Self> {
        (trip != similar_trip).then_some(Self { trip, similar_trip })
    }

    pub fn trip(&self) -> TripId {
        self.trip
    }

    pub fn similar_trip(&self) -> TripId {
        self.similar_trip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn record(fields: [&str; 5]) -> Vec<String> {
        fields.iter().map(|field| field.to_string()).collect()
    }

    #[test]
    fn test_from_records_skips_header() {
        let rows = TripRow::from_records(vec![
            record(["region", "origin_coord", "destination_coord", "datetime", "datasource"]),
            record(["NYC", "40.7,-74.0", "40.8,-74.1", "2023-01-01 09:05:00", "GPS"]),
        ]).unwrap();

        assert_eq!(rows, vec![TripRow {
            region: "NYC".into(),
            origin: "40.7,-74.0".into(),
            destination: "40.8,-74.1".into(),
            timestamp: "2023-01-01 09:05:00".into(),
            data_source: "GPS".into(),
        }]);
    }

    #[test]
    fn test_from_records_empty_and_header_only() {
        assert_eq!(TripRow::from_records(Vec::<Vec<String>>::new()), Ok(vec![]));
        assert_eq!(TripRow::from_records(vec![record(["a", "b", "c", "d", "e"])]), Ok(vec![]));
    }

    #[test]
    fn test_from_records_wrong_column_count() {
        let result = TripRow::from_records(vec![
            record(["region", "origin_coord", "destination_coord", "datetime", "datasource"]),
            record(["NYC", "40.7,-74.0", "40.8,-74.1", "2023-01-01 09:05:00", "GPS"]),
            vec!["NYC".to_string(), "40.7,-74.0".to_string()],
        ]);

        assert_eq!(result, Err(ValidationError::WrongColumnCount { row: 3, found: 2 }));
    }

    #[test]
    fn test_parse_timestamp() {
        let timestamp = parse_timestamp(" 2023-01-01 09:05:30 ").unwrap();
        assert_eq!(timestamp.date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!((timestamp.hour(), timestamp.minute(), timestamp.second()), (9, 5, 30));

        assert_eq!(
            parse_timestamp("2023-01-01T09:05:30"),
            Err(ValidationError::MalformedTimestamp("2023-01-01T09:05:30".into()))
        );
        assert!(parse_timestamp("2023-13-01 09:05:30").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_similarity_pair_rejects_self_pair() {
        assert!(SimilarityPair::new(TripId(1), TripId(1)).is_none());

        let pair = SimilarityPair::new(TripId(1), TripId(2)).unwrap();
        assert_eq!((pair.trip(), pair.similar_trip()), (TripId(1), TripId(2)));
    }
}
