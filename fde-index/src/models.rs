//! Query result model structs.
//!
//! All structs derive `Serialize` so chart front-ends can consume them as
//! JSON.

use chrono::Month;
use fde_records::metrics::{DelayCause, Field, MetricBundle};
use serde::Serialize;
use std::collections::BTreeMap;

/// Requested field -> summed value.
pub type FieldTotals = BTreeMap<Field, f64>;

/// Minutes of delay per cause over a query range (the pie chart input).
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CauseBreakdown {
    pub carrier: f64,
    pub weather: f64,
    pub nas: f64,
    pub security: f64,
    pub late_aircraft: f64,
}

impl CauseBreakdown {
    pub fn from_minutes(totals: &MetricBundle) -> Self {
        CauseBreakdown {
            carrier: totals.carrier_delay,
            weather: totals.weather_delay,
            nas: totals.nas_delay,
            security: totals.security_delay,
            late_aircraft: totals.late_aircraft_delay,
        }
    }

    pub fn get(&self, cause: DelayCause) -> f64 {
        match cause {
            DelayCause::Carrier => self.carrier,
            DelayCause::Weather => self.weather,
            DelayCause::Nas => self.nas,
            DelayCause::Security => self.security,
            DelayCause::LateAircraft => self.late_aircraft,
        }
    }

    pub fn total(&self) -> f64 {
        DelayCause::ALL.iter().map(|cause| self.get(*cause)).sum()
    }

    /// Causes with a positive total, in legend order.
    ///
    /// Pie charts drop empty slices; callers that want every cause should
    /// read the fields directly.
    pub fn nonzero(&self) -> Vec<(DelayCause, f64)> {
        DelayCause::ALL
            .iter()
            .map(|cause| (*cause, self.get(*cause)))
            .filter(|(_, value)| *value > 0.0)
            .collect()
    }
}

/// One point of a monthly time series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthValue {
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
    /// Axis label, e.g. "Jan 2019".
    pub label: String,
    pub value: f64,
}

impl MonthValue {
    pub fn new(year: i32, month: u32, value: f64) -> Self {
        MonthValue {
            year,
            month,
            label: month_label(year, month),
            value,
        }
    }
}

fn month_label(year: i32, month: u32) -> String {
    match u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok()) {
        Some(m) => format!("{} {}", &m.name()[..3], year),
        None => format!("{month}/{year}"),
    }
}

/// Meteorological season of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// December through February is Winter, March through May Spring, and so on.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }
}

/// Per-season sums of one field (the radial chart input).
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SeasonalTotals {
    pub winter: f64,
    pub spring: f64,
    pub summer: f64,
    pub fall: f64,
}

impl SeasonalTotals {
    pub fn get(&self, season: Season) -> f64 {
        match season {
            Season::Winter => self.winter,
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall => self.fall,
        }
    }

    pub fn add(&mut self, season: Season, value: f64) {
        match season {
            Season::Winter => self.winter += value,
            Season::Spring => self.spring += value,
            Season::Summer => self.summer += value,
            Season::Fall => self.fall += value,
        }
    }

    pub fn total(&self) -> f64 {
        self.winter + self.spring + self.summer + self.fall
    }
}

/// Arrival and delay totals for one entity over a range.
///
/// Feeds the per-carrier summary bars: arrivals, delayed arrivals, delay
/// minutes and the average delay per arrival.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct DelaySummary {
    pub total_flights: f64,
    pub total_delays: f64,
    pub total_delay_minutes: f64,
    /// `None` when there were no arrivals in range.
    pub avg_delay_per_arrival: Option<f64>,
}

impl DelaySummary {
    pub fn from_totals(totals: &MetricBundle) -> Self {
        let avg_delay_per_arrival = if totals.arr_flights > 0.0 {
            Some(totals.arr_delay / totals.arr_flights).filter(|v| v.is_finite())
        } else {
            None
        };
        DelaySummary {
            total_flights: totals.arr_flights,
            total_delays: totals.arr_del15,
            total_delay_minutes: totals.arr_delay,
            avg_delay_per_arrival,
        }
    }
}
