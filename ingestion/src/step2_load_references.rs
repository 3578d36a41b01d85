use common::store::{StoreError, TripStore};
use common::types::trip::TripRow;
use itertools::Itertools;
use log::{debug, info};

/// Persists one region per distinct region name and one data source per distinct data source
/// name. Names are inserted in the order they first appear, which keeps ids stable between runs on
/// the same input. All regions are written before the first data source.
///
/// Returns the number of regions and data sources.
pub(crate) fn load_references<S: TripStore + ?Sized>(
    store: &mut S,
    rows: &[TripRow],
) -> Result<(usize, usize), StoreError> {
    let region_names = rows.iter().map(|row| row.region.as_str()).unique().collect_vec();
    let data_source_names = rows.iter().map(|row| row.data_source.as_str()).unique().collect_vec();

    for name in &region_names {
        let id = store.insert_region(name)?;
        debug!(target: "ingestion", "Region '{}' has id {}", name, id);
    }

    for name in &data_source_names {
        let id = store.insert_data_source(name)?;
        debug!(target: "ingestion", "Data source '{}' has id {}", name, id);
    }

    info!(
        target: "ingestion",
        "Loaded {} regions and {} data sources",
        region_names.len(), data_source_names.len()
    );

    Ok((region_names.len(), data_source_names.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::row;
    use common::store::InMemoryStore;
    use common::types::{DataSourceId, RegionId};

    #[test]
    fn test_distinct_names_in_order_of_appearance() {
        let rows = vec![
            row("NYC", "1,1", "2,2", "2023-01-01 09:05:00", "GPS"),
            row("Boston", "1,1", "2,2", "2023-01-01 09:05:00", "GPS"),
            row("NYC", "1,1", "2,2", "2023-01-01 09:05:00", "cheap_mobile"),
        ];
        let mut store = InMemoryStore::default();

        assert_eq!(load_references(&mut store, &rows).unwrap(), (2, 2));

        assert_eq!(store.find_region("NYC").unwrap(), Some(RegionId(1)));
        assert_eq!(store.find_region("Boston").unwrap(), Some(RegionId(2)));
        assert_eq!(store.find_data_source("GPS").unwrap(), Some(DataSourceId(1)));
        assert_eq!(store.find_data_source("cheap_mobile").unwrap(), Some(DataSourceId(2)));
    }

    #[test]
    fn test_no_rows() {
        let mut store = InMemoryStore::default();

        assert_eq!(load_references(&mut store, &[]).unwrap(), (0, 0));
        assert!(store.regions().unwrap().is_empty());
    }
}
