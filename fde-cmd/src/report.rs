//! JSON reports printed by each subcommand.
//!
//! Builders take an already-loaded index so they can be tested without
//! touching the filesystem.

use fde_data::robust_scale::RobustScale;
use fde_data::stacking::{stack, StackLayer};
use fde_geo::{RegionFilter, RegionSelector};
use fde_index::metric::MetricType;
use fde_index::models::{CauseBreakdown, DelaySummary, FieldTotals, MonthValue, SeasonalTotals};
use fde_index::{AggregatedIndex, Axis};
use fde_records::metrics::{DelayCause, Field, MetricBundle};
use fde_utils::years::YearRange;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CauseSlice {
    pub cause: DelayCause,
    pub label: &'static str,
    pub minutes: f64,
}

#[derive(Debug, Serialize)]
pub struct CausesReport {
    pub axis: Axis,
    pub entity: String,
    pub range: YearRange,
    pub minutes: CauseBreakdown,
    /// Non-empty slices only.
    pub slices: Vec<CauseSlice>,
}

pub fn causes(index: &AggregatedIndex, entity: &str, range: YearRange) -> CausesReport {
    let minutes = index.cause_minutes(entity, range);
    let slices = minutes
        .nonzero()
        .into_iter()
        .map(|(cause, minutes)| CauseSlice {
            cause,
            label: cause.label(),
            minutes,
        })
        .collect();
    CausesReport {
        axis: index.axis(),
        entity: entity.to_string(),
        range,
        minutes,
        slices,
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub axis: Axis,
    pub entity: String,
    pub range: YearRange,
    pub field: Field,
    pub points: Vec<MonthValue>,
}

pub fn series(index: &AggregatedIndex, entity: &str, range: YearRange, field: Field) -> SeriesReport {
    SeriesReport {
        axis: index.axis(),
        entity: entity.to_string(),
        range,
        field,
        points: index.series_by_month(entity, range, field),
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonsReport {
    pub axis: Axis,
    pub entity: String,
    pub range: YearRange,
    pub field: Field,
    pub seasons: SeasonalTotals,
}

pub fn seasons(
    index: &AggregatedIndex,
    entity: &str,
    range: YearRange,
    field: Field,
) -> SeasonsReport {
    SeasonsReport {
        axis: index.axis(),
        entity: entity.to_string(),
        range,
        field,
        seasons: index.seasonal_totals(entity, range, field),
    }
}

/// Fields summed per counterpart for the stacked and summary bars.
fn counterpart_fields() -> Vec<Field> {
    let mut fields = DelayCause::count_fields().to_vec();
    fields.extend([Field::ArrFlights, Field::ArrDel15, Field::ArrDelay]);
    fields
}

#[derive(Debug, Serialize)]
pub struct CounterpartRow {
    pub name: String,
    pub totals: FieldTotals,
    pub summary: DelaySummary,
}

#[derive(Debug, Serialize)]
pub struct CounterpartsReport {
    pub axis: Axis,
    /// What the row names are: carriers on the airport index, airports on
    /// the carrier index.
    pub row_axis: Axis,
    /// `None` when totals span every entity.
    pub entity: Option<String>,
    pub range: YearRange,
    pub rows: Vec<CounterpartRow>,
    /// Cause counts stacked per row, carrier at the bottom.
    pub layers: Vec<StackLayer>,
}

pub fn counterparts(
    index: &AggregatedIndex,
    entity: Option<&str>,
    range: YearRange,
) -> CounterpartsReport {
    let fields = counterpart_fields();
    let totals = match entity {
        Some(entity) => index.rollup_by_counterpart(entity, range, &fields),
        None => index.rollup_all_by_counterpart(range, &fields),
    };
    let pairs: Vec<(String, FieldTotals)> = totals.into_iter().collect();
    let layers = stack(&pairs, &DelayCause::count_fields());
    let rows = pairs
        .into_iter()
        .map(|(name, totals)| {
            let mut bundle = MetricBundle::default();
            for (field, value) in &totals {
                bundle.set(*field, *value);
            }
            CounterpartRow {
                name,
                summary: DelaySummary::from_totals(&bundle),
                totals,
            }
        })
        .collect();
    CounterpartsReport {
        axis: index.axis(),
        row_axis: index.axis().counterpart(),
        entity: entity.map(str::to_string),
        range,
        rows,
        layers,
    }
}

#[derive(Debug, Serialize)]
pub struct EntityEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub first_year: i32,
    pub last_year: i32,
}

/// Every entity with its year span (slider bounds).
pub fn entities(index: &AggregatedIndex, exclude: &[String]) -> Vec<EntityEntry> {
    index
        .entity_locations()
        .into_iter()
        .filter(|location| !exclude.contains(&location.name))
        .filter_map(|location| {
            let (first_year, last_year) = index.year_bounds(&location.name)?;
            Some(EntityEntry {
                name: location.name,
                latitude: location.latitude,
                longitude: location.longitude,
                first_year,
                last_year,
            })
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ChoroplethEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the metric is undefined for this entity.
    pub value: Option<f64>,
    /// Colour position in `[0, 1]`.
    pub position: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChoroplethReport {
    pub axis: Axis,
    pub region: String,
    pub year: i32,
    pub metric: MetricType,
    pub boundaries: Vec<String>,
    pub scale: Option<RobustScale>,
    pub entries: Vec<ChoroplethEntry>,
}

pub fn choropleth(
    index: &AggregatedIndex,
    filter: &RegionFilter,
    region: RegionSelector,
    year: i32,
    metric: MetricType,
) -> ChoroplethReport {
    let visible = filter.filter(&index.entity_locations(), region);
    let values: Vec<Option<f64>> = visible
        .iter()
        .map(|location| index.metric_for(&location.name, year, metric))
        .collect();
    let scale = RobustScale::build(values.iter().copied());

    let entries = visible
        .into_iter()
        .zip(values)
        .map(|(location, value)| ChoroplethEntry {
            position: value.zip(scale).map(|(v, scale)| scale.map(v)),
            name: location.name,
            latitude: location.latitude,
            longitude: location.longitude,
            value,
        })
        .collect();

    ChoroplethReport {
        axis: index.axis(),
        region: region.to_string(),
        year,
        metric,
        boundaries: filter
            .boundaries(region)
            .into_iter()
            .map(|feature| feature.name.clone())
            .collect(),
        scale,
        entries,
    }
}
