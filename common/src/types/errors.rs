use std::fmt;
use std::fmt::Formatter;
use crate::types::TripId;

/// Input that cannot be turned into a trip, a point or a polygon
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    MalformedPoint(String),
    MalformedTimestamp(String),
    // A polygon needs at least three corners
    BoundaryTooSmall(usize),
    WrongColumnCount { row: usize, found: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedPoint(text) => {
                write!(f, "Malformed point '{text}'. Expected 'latitude,longitude'")
            }
            ValidationError::MalformedTimestamp(text) => {
                write!(f, "Malformed timestamp '{text}'. Expected 'YYYY-MM-DD HH:MM:SS'")
            }
            ValidationError::BoundaryTooSmall(found) => {
                write!(f, "A boundary needs at least 3 points, but {found} were given")
            }
            ValidationError::WrongColumnCount { row, found } => {
                write!(f, "Row {row} has {found} columns, expected 5")
            }
        }
    }
}

/// A name or id that does not refer to any persisted record
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    Region(String),
    DataSource(String),
    Trip(TripId),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Region(name) => write!(f, "Unknown region '{name}'"),
            LookupError::DataSource(name) => write!(f, "Unknown data source '{name}'"),
            LookupError::Trip(id) => write!(f, "Unknown trip {id}"),
        }
    }
}
