use crate::types::errors::ValidationError;
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

/// A geographic point in decimal degrees.
///
/// The textual representation is `"latitude,longitude"`, e.g. `"40.7,-74.0"`. Whitespace around
/// either component is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl FromStr for Point {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedPoint(text.to_string());

        let mut components = text.split(',');
        let (Some(latitude), Some(longitude), None) =
            (components.next(), components.next(), components.next())
        else {
            return Err(malformed());
        };

        let parse = |component: &str| {
            component.trim().parse::<f64>().ok().filter(|value| value.is_finite())
        };

        match (parse(latitude), parse(longitude)) {
            (Some(latitude), Some(longitude)) => Ok(Self { latitude, longitude }),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

// Planar view used for polygon tests: latitude is x, longitude is y
impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        Coord { x: point.latitude, y: point.longitude }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!("40.7,-74.0".parse::<Point>(), Ok(Point::new(40.7, -74.0)));
        assert_eq!(" 40.7 , -74.0 ".parse::<Point>(), Ok(Point::new(40.7, -74.0)));
        assert_eq!("0,0".parse::<Point>(), Ok(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_parse_malformed_point() {
        for text in ["", "40.7", "40.7;-74.0", "40.7,-74.0,12", "abc,-74.0", "40.7,", "inf,1", "NaN,1"] {
            assert_eq!(
                text.parse::<Point>(),
                Err(ValidationError::MalformedPoint(text.to_string())),
                "'{text}' should not parse"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        let point = Point::new(-33.8688, 151.2093);
        assert_eq!(point.to_string().parse::<Point>(), Ok(point));
    }

    #[test]
    fn test_into_coord() {
        let coord: Coord<f64> = Point::new(1.5, 2.5).into();
        assert_eq!(coord, Coord { x: 1.5, y: 2.5 });
    }
}
