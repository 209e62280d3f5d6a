//! Derived per-entity scalars for the choropleth.

use crate::AggregatedIndex;
use fde_records::metrics::MetricBundle;
use fde_utils::years::YearRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scalar colours an entity on the map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    /// Total delay minutes divided by total arrivals.
    #[default]
    AvgDelayPerLateFlight,
    TotalFlightsDelayed,
    TotalDelayMinutes,
}

impl MetricType {
    pub const ALL: [MetricType; 3] = [
        MetricType::AvgDelayPerLateFlight,
        MetricType::TotalFlightsDelayed,
        MetricType::TotalDelayMinutes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricType::AvgDelayPerLateFlight => "avg-delay-per-late-flight",
            MetricType::TotalFlightsDelayed => "total-flights-delayed",
            MetricType::TotalDelayMinutes => "total-delay-minutes",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricType {
    type Err = String;

    /// Accepts the kebab-case name or the camelCase form used by front-ends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "avg-delay-per-late-flight" | "avgDelayPerLateFlight" => {
                Ok(MetricType::AvgDelayPerLateFlight)
            }
            "total-flights-delayed" | "totalFlightsDelayed" => Ok(MetricType::TotalFlightsDelayed),
            "total-delay-minutes" | "totalDelayMinutes" => Ok(MetricType::TotalDelayMinutes),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

/// Reduce summed totals to one scalar.
///
/// The average is undefined without any arrival and comes back as `None`,
/// never `NaN` or infinity. Arrivals with no 15+ minute delay still count
/// toward it.
pub fn select(totals: &MetricBundle, metric: MetricType) -> Option<f64> {
    let value = match metric {
        MetricType::AvgDelayPerLateFlight => {
            if totals.arr_flights == 0.0 {
                return None;
            }
            totals.arr_delay / totals.arr_flights
        }
        MetricType::TotalFlightsDelayed => totals.arr_del15,
        MetricType::TotalDelayMinutes => totals.arr_delay,
    };
    Some(value).filter(|v| v.is_finite())
}

impl AggregatedIndex {
    /// The chosen metric for `entity` in a single year.
    pub fn metric_for(&self, entity: &str, year: i32, metric: MetricType) -> Option<f64> {
        self.metric_for_range(entity, YearRange::single(year), metric)
    }

    pub fn metric_for_range(
        &self,
        entity: &str,
        range: YearRange,
        metric: MetricType,
    ) -> Option<f64> {
        select(&self.bundle_totals(entity, range), metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DelayIndex;
    use fde_records::raw::parse_raw_records;

    fn totals(arr_flights: f64, arr_del15: f64, arr_delay: f64) -> MetricBundle {
        MetricBundle {
            arr_flights,
            arr_del15,
            arr_delay,
            ..Default::default()
        }
    }

    #[test]
    fn average_divides_by_all_arrivals() {
        assert_eq!(
            select(&totals(100.0, 10.0, 500.0), MetricType::AvgDelayPerLateFlight),
            Some(5.0)
        );
        // Arrivals but no 15+ minute delays is still a real average.
        assert_eq!(
            select(&totals(100.0, 0.0, 500.0), MetricType::AvgDelayPerLateFlight),
            Some(5.0)
        );
        assert_eq!(
            select(&totals(0.0, 0.0, 0.0), MetricType::AvgDelayPerLateFlight),
            None
        );
    }

    #[test]
    fn totals_pass_through() {
        let bundle = totals(40.0, 4.0, 100.0);
        assert_eq!(select(&bundle, MetricType::TotalFlightsDelayed), Some(4.0));
        assert_eq!(select(&bundle, MetricType::TotalDelayMinutes), Some(100.0));
    }

    #[test]
    fn metric_names_round_trip() {
        for metric in MetricType::ALL {
            assert_eq!(metric.to_string().parse::<MetricType>(), Ok(metric));
        }
        assert_eq!(
            "totalDelayMinutes".parse::<MetricType>(),
            Ok(MetricType::TotalDelayMinutes)
        );
        assert!("median".parse::<MetricType>().is_err());
    }

    #[test]
    fn metric_for_reads_one_year() {
        let csv = "\
airport_name,carrier_name,year,month,latitude,longitude,arr_flights,arr_del15,arr_delay
JFK,Delta,2019,1,40.6413,-73.7781,100,10,300
JFK,United,2019,2,40.6413,-73.7781,50,5,150
JFK,Delta,2020,1,40.6413,-73.7781,80,0,40
JFK,Delta,2021,1,40.6413,-73.7781,0,0,0
";
        let index = DelayIndex::from_raw(parse_raw_records(csv).unwrap());
        let airports = index.by_airport();

        assert_eq!(
            airports.metric_for("JFK", 2019, MetricType::AvgDelayPerLateFlight),
            Some(3.0)
        );
        assert_eq!(
            airports.metric_for("JFK", 2019, MetricType::TotalFlightsDelayed),
            Some(15.0)
        );
        assert_eq!(
            airports.metric_for("JFK", 2020, MetricType::AvgDelayPerLateFlight),
            Some(0.5)
        );
        assert_eq!(
            airports.metric_for("JFK", 2021, MetricType::AvgDelayPerLateFlight),
            None
        );
        assert_eq!(
            airports.metric_for("SFO", 2019, MetricType::AvgDelayPerLateFlight),
            None
        );
        assert_eq!(
            airports.metric_for("SFO", 2019, MetricType::TotalDelayMinutes),
            Some(0.0)
        );
        assert_eq!(
            airports.metric_for_range("JFK", YearRange(2019, 2020), MetricType::TotalDelayMinutes),
            Some(490.0)
        );
    }
}
