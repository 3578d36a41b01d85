pub mod bucketing;
pub mod clustering;
pub mod containment;
pub mod haversine;
pub mod search;
