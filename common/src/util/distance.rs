use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;
use either::Either;
use regex::Regex;

static DISTANCE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+\.?\d*)\s*(km|m)?\s*$").expect("Distance format must be a valid regex")
});

/// Distance in kilometers
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, PartialOrd)]
#[serde(try_from = "SerializedDistance")]
pub struct Distance(pub f64);

impl Distance {
    pub const DEFAULT_SIMILARITY_THRESHOLD: Distance = Distance(1_000.0);

    pub fn kilometers(&self) -> f64 {
        self.0
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}km", self.0)
    }
}

/// Serialized representation of a Distance
/// Either 10.42 (float, kilometers), "10.42km" or "420m" (String)
#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
struct SerializedDistance {
    #[serde(with = "either::serde_untagged")]
    kilometers: Either<f64, String>
}

#[derive(thiserror::Error, Debug)]
pub struct DistanceError;

impl Display for DistanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wrong distance format. Examples of valid formats: 1000, 42.1km, 300m")
    }
}

impl FromStr for Distance {
    type Err = DistanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let caps = DISTANCE_FORMAT.captures(value).ok_or(DistanceError)?;
        let amount = f64::from_str(&caps[1]).map_err(|_| DistanceError)?;

        match caps.get(2).map(|unit| unit.as_str()) {
            Some("m") => Ok(Self(amount / 1_000.0)),
            _ => Ok(Self(amount)),
        }
    }
}

impl TryFrom<SerializedDistance> for Distance {
    type Error = DistanceError;

    fn try_from(value: SerializedDistance) -> Result<Self, Self::Error> {
        match value.kilometers {
            Either::Right(value) => Distance::from_str(&value),
            Either::Left(value) if value.is_finite() && value >= 0.0 => Ok(Self(value)),
            Either::Left(_) => Err(DistanceError),
        }
    }
}
