//! Folding delay records into a [`DelayIndex`].
//!
//! # Collision Policy
//!
//! Cells are first-write-wins. When two records map to the same
//! `(entity, year, month, counterpart)` key, the first record's bundle is
//! kept and the later one is discarded; the two are never summed. The
//! discarded records are counted in [`BuildStats`] so a data load with
//! duplicate keys is visible in the logs.
//!
//! Entity coordinates follow the same rule: the first record seen for an
//! entity fixes its latitude and longitude.

use crate::{AggregatedIndex, Axis, BuildStats, DelayIndex, EntityNode};
use fde_records::metrics::MetricBundle;
use fde_records::raw::RawRecord;
use fde_records::record::DelayRecord;

impl AggregatedIndex {
    /// Store `bundle` at the composite key unless the cell is occupied.
    ///
    /// Returns `true` if the bundle was stored, `false` if an earlier bundle
    /// already holds the cell (the new one is dropped, not merged).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn insert_if_absent(
        &mut self,
        entity: &str,
        latitude: f64,
        longitude: f64,
        year: i32,
        month: u32,
        counterpart: &str,
        bundle: &MetricBundle,
    ) -> bool {
        let node = self
            .entities
            .entry(entity.to_string())
            .or_insert_with(|| EntityNode {
                latitude,
                longitude,
                years: Default::default(),
            });
        let cells = node.years.entry(year).or_default().entry(month).or_default();
        if cells.contains_key(counterpart) {
            return false;
        }
        cells.insert(counterpart.to_string(), *bundle);
        true
    }
}

impl DelayIndex {
    /// Build both indices from normalized records in a single pass.
    pub fn build<I>(records: I) -> DelayIndex
    where
        I: IntoIterator<Item = DelayRecord>,
    {
        Self::build_with_stats(records, BuildStats::default())
    }

    /// Normalize raw rows, count the skipped ones, and build both indices.
    pub fn from_raw<I>(rows: I) -> DelayIndex
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut stats = BuildStats::default();
        let records = rows
            .into_iter()
            .filter_map(|row| match row.normalize() {
                Ok(record) => Some(record),
                Err(reason) => {
                    log::debug!(
                        "[FDE Debug] aggregator: skipping row for '{}'/'{}': {}",
                        row.location,
                        row.carrier,
                        reason
                    );
                    *stats.skipped.entry(reason).or_insert(0) += 1;
                    None
                }
            })
            .collect::<Vec<_>>();
        Self::build_with_stats(records, stats)
    }

    fn build_with_stats<I>(records: I, mut stats: BuildStats) -> DelayIndex
    where
        I: IntoIterator<Item = DelayRecord>,
    {
        let mut by_airport = AggregatedIndex::new(Axis::Airport);
        let mut by_carrier = AggregatedIndex::new(Axis::Carrier);

        for record in records {
            stats.accepted += 1;
            let stored = by_airport.insert_if_absent(
                &record.location,
                record.latitude,
                record.longitude,
                record.year,
                record.month,
                &record.carrier,
                &record.metrics,
            );
            if !stored {
                stats.duplicate_airport_cells += 1;
            }
            let stored = by_carrier.insert_if_absent(
                &record.carrier,
                record.latitude,
                record.longitude,
                record.year,
                record.month,
                &record.location,
                &record.metrics,
            );
            if !stored {
                stats.duplicate_carrier_cells += 1;
            }
        }

        log::info!(
            "[FDE Debug] aggregator: Indexed {} records into {} airports and {} carriers, skipped {}",
            stats.accepted,
            by_airport.len(),
            by_carrier.len(),
            stats.skipped_total()
        );
        if stats.duplicate_airport_cells > 0 || stats.duplicate_carrier_cells > 0 {
            log::warn!(
                "[FDE Debug] aggregator: Discarded {} airport and {} carrier duplicate cells (first write kept)",
                stats.duplicate_airport_cells,
                stats.duplicate_carrier_cells
            );
        }

        DelayIndex {
            by_airport,
            by_carrier,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fde_records::raw::parse_raw_records;
    use fde_records::record::Skip;

    const HEADER: &str = "airport_name,carrier_name,year,month,latitude,longitude,arr_flights,arr_del15,carrier_delay,arr_delay\n";

    fn index_from(rows: &str) -> DelayIndex {
        let csv = format!("{HEADER}{rows}");
        DelayIndex::from_raw(parse_raw_records(&csv).unwrap())
    }

    #[test]
    fn builds_both_axes() {
        let index = index_from(
            "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
JFK,United,2019,1,40.6413,-73.7781,50,5,10,40
LAX,Delta,2019,1,33.9416,-118.4085,80,8,20,90
",
        );
        assert_eq!(index.by_airport().len(), 2);
        assert_eq!(index.by_carrier().len(), 2);

        let jfk = index.by_airport().entity("JFK").unwrap();
        let cells = &jfk.years[&2019][&1];
        assert_eq!(cells.len(), 2);
        assert_eq!(cells["Delta"].carrier_delay, 30.0);

        let delta = index.by_carrier().entity("Delta").unwrap();
        let cells = &delta.years[&2019][&1];
        assert_eq!(cells.len(), 2);
        assert_eq!(cells["LAX"].carrier_delay, 20.0);
    }

    #[test]
    fn rows_with_bad_coordinates_reach_neither_index() {
        let index = index_from(
            "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
BAD,Ghost Air,2019,1,,-73.0,100,10,30,120
ORD,Ghost Air,2019,1,41.97,abc,100,10,30,120
",
        );
        assert!(index.by_airport().contains("JFK"));
        assert!(!index.by_airport().contains("BAD"));
        assert!(!index.by_airport().contains("ORD"));
        assert!(!index.by_carrier().contains("Ghost Air"));
        assert_eq!(index.stats().accepted, 1);
        assert_eq!(index.stats().skipped_for(Skip::MalformedCoordinate), 2);
    }

    #[test]
    fn duplicate_cell_keeps_first_bundle() {
        let index = index_from(
            "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
JFK,Delta,2019,1,40.6413,-73.7781,900,90,999,9999
",
        );
        let cell = &index.by_airport().entity("JFK").unwrap().years[&2019][&1]["Delta"];
        assert_eq!(cell.carrier_delay, 30.0);
        assert_eq!(cell.arr_flights, 100.0);

        let cell = &index.by_carrier().entity("Delta").unwrap().years[&2019][&1]["JFK"];
        assert_eq!(cell.carrier_delay, 30.0);

        assert_eq!(index.stats().accepted, 2);
        assert_eq!(index.stats().duplicate_airport_cells, 1);
        assert_eq!(index.stats().duplicate_carrier_cells, 1);
    }

    #[test]
    fn first_record_fixes_entity_coordinates() {
        let index = index_from(
            "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
JFK,United,2019,2,10.0,10.0,50,5,10,40
",
        );
        let jfk = index.by_airport().entity("JFK").unwrap();
        assert_eq!(jfk.latitude, 40.6413);
        assert_eq!(jfk.longitude, -73.7781);
    }

    #[test]
    fn entity_keys_are_case_sensitive() {
        let index = index_from(
            "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
jfk,Delta,2019,1,40.6413,-73.7781,100,10,30,120
",
        );
        assert_eq!(index.by_airport().len(), 2);
        assert_eq!(index.stats().duplicate_airport_cells, 0);
        // Same carrier, different airport keys: two distinct carrier cells.
        assert_eq!(index.stats().duplicate_carrier_cells, 0);
    }

    #[test]
    fn build_is_deterministic() {
        let rows = "\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120
LAX,United,2020,6,33.9416,-118.4085,80,8,20,90
";
        assert_eq!(index_from(rows), index_from(rows));
    }

    #[test]
    fn build_accepts_normalized_records_directly() {
        let records = parse_raw_records(&format!(
            "{HEADER}JFK,Delta,2019,1,40.6413,-73.7781,100,10,30,120\n"
        ))
        .unwrap()
        .iter()
        .filter_map(|row| row.normalize().ok())
        .collect::<Vec<_>>();
        let index = DelayIndex::build(records);
        assert_eq!(index.stats().accepted, 1);
        assert_eq!(index.stats().skipped_total(), 0);
        assert!(index.by_airport().contains("JFK"));
    }
}
