use crate::types::trip::{SimilarityPair, Trip, TIMESTAMP_FORMAT};
use itertools::Itertools;
use polars::df;
use polars::error::{PolarsError, PolarsResult};
use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::CsvWriter;
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

/// One row per trip, points split into their components
pub fn trips_frame(trips: &[Trip]) -> PolarsResult<DataFrame> {
    df![
        "trip_id" => trips.iter().map(|t| t.id.0).collect_vec(),
        "origin_latitude" => trips.iter().map(|t| t.origin.latitude).collect_vec(),
        "origin_longitude" => trips.iter().map(|t| t.origin.longitude).collect_vec(),
        "destination_latitude" => trips.iter().map(|t| t.destination.latitude).collect_vec(),
        "destination_longitude" => trips.iter().map(|t| t.destination.longitude).collect_vec(),
        "date" => trips.iter().map(|t| t.timestamp.format(TIMESTAMP_FORMAT).to_string()).collect_vec(),
        "region_id" => trips.iter().map(|t| t.region.0).collect_vec(),
        "datasource_id" => trips.iter().map(|t| t.data_source.0).collect_vec(),
    ]
}

pub fn similarity_frame(pairs: &[SimilarityPair]) -> PolarsResult<DataFrame> {
    df![
        "trip_id" => pairs.iter().map(|p| p.trip().0).collect_vec(),
        "similar_trip_id" => pairs.iter().map(|p| p.similar_trip().0).collect_vec(),
    ]
}

pub fn write_csv(
    path: PathBuf,
    mut df: DataFrame
) -> Result<(), PolarsError> {
    let mut file = prepare_file(path)?;

    CsvWriter::new(&mut file).finish(&mut df)?;

    Ok(())
}

fn prepare_file(
    path: PathBuf,
) -> Result<File, std::io::Error> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(path)?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::point::Point;
    use crate::types::trip::parse_timestamp;
    use crate::types::{DataSourceId, RegionId, TripId};

    #[test]
    fn test_similarity_frame() {
        let pairs = [
            SimilarityPair::new(TripId(1), TripId(2)).unwrap(),
            SimilarityPair::new(TripId(2), TripId(1)).unwrap(),
        ];

        let expected = df![
            "trip_id" => [1u32, 2],
            "similar_trip_id" => [2u32, 1],
        ].unwrap();

        assert!(similarity_frame(&pairs).unwrap().equals(&expected));
    }

    #[test]
    fn test_trips_frame_and_write() {
        let trip = Trip {
            id: TripId(7),
            origin: Point::new(40.7, -74.0),
            destination: Point::new(40.8, -74.1),
            timestamp: parse_timestamp("2023-01-01 09:05:00").unwrap(),
            region: RegionId(1),
            data_source: DataSourceId(2),
        };

        let frame = trips_frame(&[trip]).unwrap();
        assert_eq!(frame.shape(), (1, 8));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("trips.csv");
        write_csv(path.clone(), frame).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("trip_id,origin_latitude,origin_longitude,destination_latitude,destination_longitude,date,region_id,datasource_id")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,40.7,"));
        assert!(row.ends_with(",2023-01-01 09:05:00,1,2"));
        assert_eq!(lines.next(), None);
    }
}
