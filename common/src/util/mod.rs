pub mod df;
pub mod distance;
pub mod logging;
