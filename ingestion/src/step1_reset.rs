use common::store::{StoreError, TripStore};
use log::info;

/// Deletes similarity pairs, trips, data sources and regions, in that order
pub(crate) fn reset<S: TripStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.reset()?;
    info!(target: "ingestion", "Deleted data of the previous batch");

    Ok(())
}
