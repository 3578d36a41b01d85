use std::fmt;
use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;

use common::types::errors::ValidationError;
use common::types::trip::TripRow;
use itertools::Itertools;
use polars::frame::DataFrame;
use polars::prelude::{CsvReadOptions, PolarsResult, SerReader};

/// Reads a trip file from disk. See [`parse_trip_csv`] for the expected format.
pub fn read_trip_file(path: &Path) -> Result<Vec<TripRow>, ReadError> {
    let frame = csv_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    rows_from_frame(&frame)
}

/// Parses trip rows from CSV text.
///
/// The first line is a header and is skipped. Every line has five columns: region, origin point,
/// destination point, timestamp and data source. Points contain a comma (`"40.7,-74.0"`) and
/// therefore have to be quoted.
pub fn parse_trip_csv(text: &str) -> Result<Vec<TripRow>, ReadError> {
    let frame = csv_options()
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;

    rows_from_frame(&frame)
}

// The header is read as a regular row and dropped by `TripRow::from_records`. Every column is read
// as a string, parsing happens when trips are loaded.
fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
}

fn rows_from_frame(frame: &DataFrame) -> Result<Vec<TripRow>, ReadError> {
    let columns = frame.get_columns().iter()
        .map(|column| column.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    // Polars pads short rows with nulls and reads empty fields as null, so only non-null fields
    // count. A short row or an empty field then fails the column count check.
    let records = (0..frame.height())
        .map(|row| {
            columns.iter()
                .filter_map(|column| column.get(row).map(str::to_string))
                .collect_vec()
        });

    Ok(TripRow::from_records(records)?)
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    Polars(#[from] polars::error::PolarsError),
    Validation(#[from] ValidationError),
}

impl Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            ReadError::Polars(err) => err,
            ReadError::Validation(err) => err,
        };
        write!(f, "{}", err)
    }
}
