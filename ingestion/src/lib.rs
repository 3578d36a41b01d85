pub mod batch;
pub mod trip_file;
mod step1_reset;
mod step2_load_references;
mod step3_load_trips;
mod step4_cluster;

pub use batch::{Batch, BatchStage, BatchSummary, IngestError, Ingestor, StateError};
