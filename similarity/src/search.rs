use std::fmt;
use std::fmt::Display;

use common::store::{StoreError, TripStore};
use common::types::errors::{LookupError, ValidationError};
use common::types::trip::Trip;
use log::debug;
use serde::Deserialize;

use crate::containment::Boundary;

/// Selects trips by region, by polygon, or both.
///
/// If both are given, the region selects the candidate trips and the polygon filters them, so a
/// trip must be in the region AND inside the polygon. A polygon that is given must have at least
/// three points; an empty list is rejected rather than treated as "no polygon".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, rename = "list")]
    pub boundary: Option<Vec<String>>,
}

pub fn search<S: TripStore + ?Sized>(store: &S, query: &TripQuery) -> Result<Vec<Trip>, QueryError> {
    let boundary = query.boundary.as_deref()
        .map(|texts| Boundary::parse(texts))
        .transpose()?;

    let candidates = match (&query.region, &boundary) {
        (None, None) => return Err(QueryError::MissingSelector),
        (Some(name), _) => {
            let region = store.find_region(name)?
                .ok_or_else(|| LookupError::Region(name.clone()))?;
            store.trips_in_region(region)?
        }
        (None, Some(_)) => store.trips()?,
    };

    let trips = match boundary {
        Some(boundary) => candidates.into_iter()
            .filter(|trip| boundary.contains_trip(trip))
            .collect::<Vec<Trip>>(),
        None => candidates,
    };
    debug!(target: "similarity", "Search matched {} trips", trips.len());

    Ok(trips)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    Validation(#[from] ValidationError),
    Lookup(#[from] LookupError),
    Store(#[from] StoreError),
    MissingSelector,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            QueryError::Validation(err) => err,
            QueryError::Lookup(err) => err,
            QueryError::Store(err) => err,
            QueryError::MissingSelector => &"Neither a region nor a list of boundary points was given",
        };
        write!(f, "{}", err)
    }
}
