//! Range queries over an [`AggregatedIndex`].
//!
//! Every query takes an inclusive [`YearRange`]; a range whose start is past
//! its end selects nothing. Entities or years missing from the index
//! contribute zero rather than an error.

use crate::models::{
    CauseBreakdown, DelaySummary, FieldTotals, MonthValue, Season, SeasonalTotals,
};
use crate::{AggregatedIndex, CounterpartCells, EntityNode};
use fde_records::location::EntityLocation;
use fde_records::metrics::{Field, MetricBundle};
use fde_utils::years::YearRange;
use std::collections::BTreeMap;

/// Walk the month cells of one node that fall inside `range`, in
/// chronological order.
fn months_in_range(
    node: &EntityNode,
    range: YearRange,
) -> impl Iterator<Item = (i32, u32, &CounterpartCells)> {
    // BTreeMap::range panics on an inverted range.
    let years = if range.is_empty() {
        None
    } else {
        Some(node.years.range(range.start()..=range.end()))
    };
    years.into_iter().flatten().flat_map(|(year, months)| {
        months
            .iter()
            .map(move |(month, cells)| (*year, *month, cells))
    })
}

fn add_fields(totals: &mut FieldTotals, bundle: &MetricBundle, fields: &[Field]) {
    for field in fields {
        *totals.entry(*field).or_insert(0.0) += bundle.get(*field);
    }
}

fn zeroed(fields: &[Field]) -> FieldTotals {
    fields.iter().map(|field| (*field, 0.0)).collect()
}

impl AggregatedIndex {
    fn cells_in_range<'a>(
        &'a self,
        entity: &str,
        range: YearRange,
    ) -> impl Iterator<Item = (i32, u32, &'a CounterpartCells)> + 'a {
        self.entity(entity)
            .into_iter()
            .flat_map(move |node| months_in_range(node, range))
    }

    /// Sum each requested field for `entity` over every month and
    /// counterpart in `range`.
    ///
    /// Every requested field is present in the result, zero when nothing
    /// matched.
    pub fn rollup(&self, entity: &str, range: YearRange, fields: &[Field]) -> FieldTotals {
        let mut totals = zeroed(fields);
        for (_, _, cells) in self.cells_in_range(entity, range) {
            for bundle in cells.values() {
                add_fields(&mut totals, bundle, fields);
            }
        }
        totals
    }

    /// All fifteen fields summed for `entity` over `range`.
    pub fn bundle_totals(&self, entity: &str, range: YearRange) -> MetricBundle {
        let mut totals = MetricBundle::default();
        for (_, _, cells) in self.cells_in_range(entity, range) {
            for bundle in cells.values() {
                totals += bundle;
            }
        }
        totals
    }

    /// Delay minutes per cause for `entity` over `range`.
    pub fn cause_minutes(&self, entity: &str, range: YearRange) -> CauseBreakdown {
        CauseBreakdown::from_minutes(&self.bundle_totals(entity, range))
    }

    /// Totals for one entity, split by counterpart.
    ///
    /// Only counterparts with at least one cell in range appear.
    pub fn rollup_by_counterpart(
        &self,
        entity: &str,
        range: YearRange,
        fields: &[Field],
    ) -> BTreeMap<String, FieldTotals> {
        let mut by_counterpart: BTreeMap<String, FieldTotals> = BTreeMap::new();
        for (_, _, cells) in self.cells_in_range(entity, range) {
            for (counterpart, bundle) in cells {
                let totals = by_counterpart
                    .entry(counterpart.clone())
                    .or_insert_with(|| zeroed(fields));
                add_fields(totals, bundle, fields);
            }
        }
        by_counterpart
    }

    /// Totals across every entity in the index, keyed by counterpart.
    ///
    /// On the airport index this yields one row per carrier summed over all
    /// airports.
    pub fn rollup_all_by_counterpart(
        &self,
        range: YearRange,
        fields: &[Field],
    ) -> BTreeMap<String, FieldTotals> {
        let mut by_counterpart: BTreeMap<String, FieldTotals> = BTreeMap::new();
        for (_, node) in self.entities() {
            for (_, _, cells) in months_in_range(node, range) {
                for (counterpart, bundle) in cells {
                    let totals = by_counterpart
                        .entry(counterpart.clone())
                        .or_insert_with(|| zeroed(fields));
                    add_fields(totals, bundle, fields);
                }
            }
        }
        log::debug!(
            "[FDE Debug] queries: {} counterparts across {} entities for {}-{}",
            by_counterpart.len(),
            self.len(),
            range.start(),
            range.end()
        );
        by_counterpart
    }

    /// Monthly series of one field, summed across counterparts.
    ///
    /// Points come out sorted by (year, month); months with no cells are
    /// absent rather than zero.
    pub fn series_by_month(&self, entity: &str, range: YearRange, field: Field) -> Vec<MonthValue> {
        self.cells_in_range(entity, range)
            .map(|(year, month, cells)| {
                let value = cells.values().map(|bundle| bundle.get(field)).sum();
                MonthValue::new(year, month, value)
            })
            .collect()
    }

    /// One field summed into the four meteorological seasons.
    pub fn seasonal_totals(&self, entity: &str, range: YearRange, field: Field) -> SeasonalTotals {
        let mut totals = SeasonalTotals::default();
        for (_, month, cells) in self.cells_in_range(entity, range) {
            if let Some(season) = Season::from_month(month) {
                totals.add(season, cells.values().map(|bundle| bundle.get(field)).sum());
            }
        }
        totals
    }

    /// Earliest and latest year with data for `entity`.
    pub fn year_bounds(&self, entity: &str) -> Option<(i32, i32)> {
        let years = &self.entity(entity)?.years;
        let first = *years.keys().next()?;
        let last = *years.keys().next_back()?;
        Some((first, last))
    }

    pub fn entity_locations(&self) -> Vec<EntityLocation> {
        self.entities()
            .map(|(name, node)| EntityLocation::new(name, node.latitude, node.longitude))
            .collect()
    }

    pub fn entity_names(&self) -> Vec<String> {
        self.entities().map(|(name, _)| name.to_string()).collect()
    }

    /// Arrivals, delayed arrivals and delay minutes for `entity` over `range`.
    pub fn delay_summary(&self, entity: &str, range: YearRange) -> DelaySummary {
        DelaySummary::from_totals(&self.bundle_totals(entity, range))
    }
}

#[cfg(test)]
mod tests {
    use crate::DelayIndex;
    use fde_records::metrics::{DelayCause, Field};
    use fde_records::raw::parse_raw_records;
    use fde_utils::years::YearRange;

    const HEADER: &str = "airport_name,carrier_name,year,month,latitude,longitude,arr_flights,arr_del15,carrier_ct,arr_delay,carrier_delay,weather_delay,late_aircraft_delay\n";

    fn sample_index() -> DelayIndex {
        let csv = format!(
            "{HEADER}\
JFK,Delta,2020,3,40.6413,-73.7781,90,9,2.5,100,15,5,0
JFK,Delta,2019,1,40.6413,-73.7781,100,10,3.0,120,30,10,5
JFK,United,2019,1,40.6413,-73.7781,50,5,1.5,40,10,0,0
JFK,Delta,2019,7,40.6413,-73.7781,110,20,4.0,300,50,20,25
JFK,Delta,2019,12,40.6413,-73.7781,60,6,1.0,70,8,2,1
JFK,Delta,2021,6,40.6413,-73.7781,70,7,2.0,80,12,0,3
JFK,Delta,2019,1,40.6413,-73.7781,999,999,999,999,999,999,999
LAX,Delta,2019,1,33.9416,-118.4085,80,8,2.0,90,20,0,0
"
        );
        DelayIndex::from_raw(parse_raw_records(&csv).unwrap())
    }

    #[test]
    fn cause_minutes_keeps_first_duplicate() {
        let index = sample_index();
        let minutes = index
            .by_airport()
            .cause_minutes("JFK", YearRange(2019, 2019));
        // Jan (Delta 30 + United 10), Jul 50, Dec 8; the 999 duplicate is dropped.
        assert_eq!(minutes.carrier, 98.0);
        assert_eq!(minutes.weather, 32.0);
        assert_eq!(minutes.late_aircraft, 31.0);
        assert_eq!(minutes.nas, 0.0);
        assert_eq!(minutes.get(DelayCause::Carrier), 98.0);
    }

    #[test]
    fn duplicate_row_does_not_change_cause_minutes() {
        let csv = format!(
            "{HEADER}\
JFK,Delta,2019,1,40.6413,-73.7781,100,10,3.0,120,30,0,0
JFK,Delta,2019,1,40.6413,-73.7781,100,10,3.0,120,999,0,0
"
        );
        let index = DelayIndex::from_raw(parse_raw_records(&csv).unwrap());
        let minutes = index
            .by_airport()
            .cause_minutes("JFK", YearRange(2019, 2019));
        assert_eq!(minutes.carrier, 30.0);
    }

    #[test]
    fn single_year_range_matches_collapsed_range() {
        let index = sample_index();
        let fields = [Field::CarrierDelay, Field::ArrFlights];
        let single = index
            .by_airport()
            .rollup("JFK", YearRange::single(2020), &fields);
        let collapsed = index
            .by_airport()
            .rollup("JFK", YearRange(2020, 2020), &fields);
        assert_eq!(single, collapsed);
        assert_eq!(single[&Field::CarrierDelay], 15.0);
    }

    #[test]
    fn multi_year_rollup_is_sum_of_single_years() {
        let index = sample_index();
        let airports = index.by_airport();
        let fields = Field::ALL;
        let whole = airports.rollup("JFK", YearRange(2019, 2021), &fields);
        for field in fields {
            let by_year: f64 = (2019..=2021)
                .map(|year| airports.rollup("JFK", YearRange::single(year), &fields)[&field])
                .sum();
            assert!((whole[&field] - by_year).abs() < 1e-9, "{field}");
        }
    }

    #[test]
    fn missing_entity_or_year_is_zero() {
        let index = sample_index();
        let airports = index.by_airport();
        let fields = [Field::ArrDelay];

        let totals = airports.rollup("SFO", YearRange(2019, 2021), &fields);
        assert_eq!(totals[&Field::ArrDelay], 0.0);

        let totals = airports.rollup("JFK", YearRange(1990, 1995), &fields);
        assert_eq!(totals[&Field::ArrDelay], 0.0);

        assert_eq!(
            airports.cause_minutes("SFO", YearRange(2019, 2019)).total(),
            0.0
        );
        assert!(airports
            .series_by_month("SFO", YearRange(2019, 2021), Field::ArrDelay)
            .is_empty());
    }

    #[test]
    fn inverted_range_selects_nothing() {
        let index = sample_index();
        let totals = index
            .by_airport()
            .rollup("JFK", YearRange(2021, 2019), &[Field::ArrDelay]);
        assert_eq!(totals[&Field::ArrDelay], 0.0);
        assert!(index
            .by_airport()
            .series_by_month("JFK", YearRange(2021, 2019), Field::ArrDelay)
            .is_empty());
    }

    #[test]
    fn series_is_sorted_even_when_rows_are_not() {
        let index = sample_index();
        let series = index
            .by_airport()
            .series_by_month("JFK", YearRange(2019, 2021), Field::CarrierCt);
        let keys: Vec<(i32, u32)> = series.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(
            keys,
            vec![(2019, 1), (2019, 7), (2019, 12), (2020, 3), (2021, 6)]
        );
        // Jan 2019 sums both carriers.
        assert!((series[0].value - 4.5).abs() < 1e-9);
        assert_eq!(series[0].label, "Jan 2019");
    }

    #[test]
    fn seasonal_totals_match_series_sum() {
        let index = sample_index();
        let range = YearRange(2019, 2021);
        let airports = index.by_airport();
        let seasons = airports.seasonal_totals("JFK", range, Field::ArrDelay);
        let series_sum: f64 = airports
            .series_by_month("JFK", range, Field::ArrDelay)
            .iter()
            .map(|p| p.value)
            .sum();
        assert!((seasons.total() - series_sum).abs() < 1e-9);
        // Jan 2019 (120 + 40) and Dec 2019 (70).
        assert_eq!(seasons.winter, 230.0);
        assert_eq!(seasons.spring, 100.0);
        assert_eq!(seasons.summer, 380.0);
        assert_eq!(seasons.fall, 0.0);
    }

    #[test]
    fn rollup_by_counterpart_splits_carriers() {
        let index = sample_index();
        let rows = index.by_airport().rollup_by_counterpart(
            "JFK",
            YearRange(2019, 2019),
            &[Field::ArrFlights],
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows["Delta"][&Field::ArrFlights], 270.0);
        assert_eq!(rows["United"][&Field::ArrFlights], 50.0);
    }

    #[test]
    fn rollup_all_by_counterpart_sums_across_entities() {
        let index = sample_index();
        let rows = index
            .by_airport()
            .rollup_all_by_counterpart(YearRange(2019, 2019), &[Field::ArrFlights]);
        // Delta at JFK (100 + 110 + 60) and LAX (80).
        assert_eq!(rows["Delta"][&Field::ArrFlights], 350.0);
        assert_eq!(rows["United"][&Field::ArrFlights], 50.0);

        let rows = index
            .by_carrier()
            .rollup_all_by_counterpart(YearRange(2019, 2019), &[Field::ArrFlights]);
        assert_eq!(rows["JFK"][&Field::ArrFlights], 320.0);
        assert_eq!(rows["LAX"][&Field::ArrFlights], 80.0);
    }

    #[test]
    fn year_bounds_and_locations() {
        let index = sample_index();
        assert_eq!(index.by_airport().year_bounds("JFK"), Some((2019, 2021)));
        assert_eq!(index.by_airport().year_bounds("LAX"), Some((2019, 2019)));
        assert_eq!(index.by_airport().year_bounds("SFO"), None);

        let locations = index.by_airport().entity_locations();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "JFK");
        assert_eq!(locations[1].latitude, 33.9416);

        assert_eq!(index.by_carrier().entity_names(), vec!["Delta", "United"]);
    }

    #[test]
    fn delay_summary_for_carrier() {
        let index = sample_index();
        let summary = index
            .by_carrier()
            .delay_summary("United", YearRange(2019, 2021));
        assert_eq!(summary.total_flights, 50.0);
        assert_eq!(summary.total_delays, 5.0);
        assert_eq!(summary.total_delay_minutes, 40.0);
        assert_eq!(summary.avg_delay_per_arrival, Some(0.8));
    }
}
