//! In-memory aggregation index for flight delay data.
//!
//! This crate folds normalized delay records into two nested indices and
//! exposes the range queries the chart front-ends redraw from on every
//! interaction (year-range drag, region toggle, metric switch).
//!
//! # Architecture
//!
//! - [`DelayIndex::build`] makes a single pass over the records and returns
//!   an immutable [`DelayIndex`]; nothing mutates it afterwards. Loading a new
//!   data file means building a new index and dropping the old one.
//! - Each [`AggregatedIndex`] is keyed by one [`Axis`]: airports (with the
//!   carrier as counterpart) or carriers (with the airport as counterpart).
//! - Every level is a `BTreeMap`, so queries walk years and months in
//!   chronological order without sorting.
//! - All queries take `&self` and return owned, serializable models from
//!   [`crate::models`].
//!
//! # Usage
//!
//! ```rust
//! use fde_index::DelayIndex;
//! use fde_records::raw::parse_raw_records;
//! use fde_utils::years::YearRange;
//!
//! let rows = parse_raw_records(
//!     "airport_name,carrier_name,year,month,latitude,longitude,carrier_delay\n\
//!      JFK,Delta,2019,1,40.6413,-73.7781,30\n",
//! )
//! .unwrap();
//! let index = DelayIndex::from_raw(rows);
//!
//! let minutes = index.by_airport().cause_minutes("JFK", YearRange(2019, 2019));
//! assert_eq!(minutes.carrier, 30.0);
//! ```
//!
//! # Index Shape
//!
//! ```text
//! entity -> EntityNode { latitude, longitude,
//!     year -> month -> counterpart -> MetricBundle }
//! ```
//!
//! A `(entity, year, month, counterpart)` cell is written once. See
//! [`aggregator`] for the collision policy.

pub mod aggregator;
pub mod metric;
pub mod models;
mod queries;

use fde_records::metrics::MetricBundle;
use fde_records::record::Skip;
use serde::Serialize;
use std::collections::BTreeMap;

/// counterpart -> bundle
pub type CounterpartCells = BTreeMap<String, MetricBundle>;
/// month (1-12) -> counterpart cells
pub type MonthCells = BTreeMap<u32, CounterpartCells>;
/// year -> month cells
pub type YearCells = BTreeMap<i32, MonthCells>;

/// Which kind of entity an index is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Keyed by airport; counterparts are carriers.
    Airport,
    /// Keyed by carrier; counterparts are airports.
    Carrier,
}

impl Axis {
    /// The axis counterparts of this index are drawn from.
    pub fn counterpart(&self) -> Axis {
        match self {
            Axis::Airport => Axis::Carrier,
            Axis::Carrier => Axis::Airport,
        }
    }
}

/// Static attributes of one entity plus its dated cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityNode {
    /// Latitude of the first record seen for this entity.
    pub latitude: f64,
    /// Longitude of the first record seen for this entity.
    pub longitude: f64,
    pub years: YearCells,
}

/// A multi-level index over one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedIndex {
    axis: Axis,
    entities: BTreeMap<String, EntityNode>,
}

impl AggregatedIndex {
    pub(crate) fn new(axis: Axis) -> Self {
        AggregatedIndex {
            axis,
            entities: BTreeMap::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Look up one entity. Keys are case-sensitive.
    pub fn entity(&self, name: &str) -> Option<&EntityNode> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Iterate entities in key order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &EntityNode)> {
        self.entities.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Counters collected while building a [`DelayIndex`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildStats {
    /// Records that passed normalization and were offered to the index.
    pub accepted: usize,
    /// Raw rows left out, by reason.
    pub skipped: BTreeMap<Skip, usize>,
    /// Records whose airport-index cell was already occupied.
    pub duplicate_airport_cells: usize,
    /// Records whose carrier-index cell was already occupied.
    pub duplicate_carrier_cells: usize,
}

impl BuildStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: Skip) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Both indices built from one data load.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayIndex {
    by_airport: AggregatedIndex,
    by_carrier: AggregatedIndex,
    stats: BuildStats,
}

impl DelayIndex {
    /// Airport-keyed index (counterpart: carrier).
    pub fn by_airport(&self) -> &AggregatedIndex {
        &self.by_airport
    }

    /// Carrier-keyed index (counterpart: airport).
    pub fn by_carrier(&self) -> &AggregatedIndex {
        &self.by_carrier
    }

    pub fn index(&self, axis: Axis) -> &AggregatedIndex {
        match axis {
            Axis::Airport => &self.by_airport,
            Axis::Carrier => &self.by_carrier,
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }
}
