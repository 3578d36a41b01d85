use common::types::errors::ValidationError;
use common::types::point::Point;
use common::types::trip::Trip;
use geo::{Contains, Coord, LineString, Polygon};
use itertools::Itertools;

/// A polygon given by its corners as (latitude, longitude) points.
///
/// The polygon lives in the plane spanned by latitude (x) and longitude (y), there is no geodesic
/// correction. This is only accurate for small regions and breaks down for polygons that cross the
/// antimeridian.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygon: Polygon<f64>,
}

impl Boundary {
    /// The ring is closed implicitly, the last point connects to the first one.
    pub fn new(points: &[Point]) -> Result<Self, ValidationError> {
        if points.len() < 3 {
            return Err(ValidationError::BoundaryTooSmall(points.len()));
        }

        let ring = points.iter()
            .map(|point| Coord::from(*point))
            .collect_vec();

        Ok(Self { polygon: Polygon::new(LineString::from(ring), vec![]) })
    }

    /// Parses every point with the `"latitude,longitude"` format
    pub fn parse<S: AsRef<str>>(texts: &[S]) -> Result<Self, ValidationError> {
        let points = texts.iter()
            .map(|text| text.as_ref().parse::<Point>())
            .collect::<Result<Vec<Point>, ValidationError>>()?;

        Self::new(&points)
    }

    /// Points on the boundary itself are outside
    pub fn contains_point(&self, point: &Point) -> bool {
        self.polygon.contains(&Coord::from(*point))
    }

    /// Whether origin and destination of the trip are both strictly inside
    pub fn contains_trip(&self, trip: &Trip) -> bool {
        self.contains_point(&trip.origin) && self.contains_point(&trip.destination)
    }
}

/// Whether `origin` and `destination` both lie strictly inside the polygon described by
/// `boundary`.
pub fn is_inside(origin: &Point, destination: &Point, boundary: &[Point]) -> Result<bool, ValidationError> {
    let boundary = Boundary::new(boundary)?;

    Ok(boundary.contains_point(origin) && boundary.contains_point(destination))
}
