use crate::metrics::{Field, MetricBundle};
use crate::raw::RawRecord;
use chrono::Month;
use fde_utils::numbers::{coalesce_to_zero, parse_finite, parse_whole};
use serde::Serialize;
use thiserror::Error;

/// A validated, fully numeric delay record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayRecord {
    /// Airport name, the location entity.
    pub location: String,
    /// Carrier name, the carrier entity.
    pub carrier: String,
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub metrics: MetricBundle,
}

/// Why a raw row was left out of the index.
///
/// These are expected data-quality outcomes, not failures: callers count them
/// and move on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Skip {
    /// Latitude or longitude is missing or not a finite number.
    #[error("latitude or longitude is not a finite number")]
    MalformedCoordinate,

    /// Year is not a whole number, or month is outside 1-12.
    #[error("year or month is not a valid calendar period")]
    MalformedPeriod,

    /// Airport or carrier name is blank.
    #[error("airport or carrier name is missing")]
    MissingEntity,
}

impl RawRecord {
    /// Validate and coerce this row.
    ///
    /// Count and minute columns coalesce to zero; coordinates, period and
    /// entity names must be present or the row is skipped whole.
    pub fn normalize(&self) -> Result<DelayRecord, Skip> {
        let (latitude, longitude) =
            match (parse_finite(&self.latitude), parse_finite(&self.longitude)) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => return Err(Skip::MalformedCoordinate),
            };

        let location = self.location.trim();
        let carrier = self.carrier.trim();
        if location.is_empty() || carrier.is_empty() {
            return Err(Skip::MissingEntity);
        }

        let year = parse_whole(&self.year)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or(Skip::MalformedPeriod)?;
        let month = parse_whole(&self.month)
            .and_then(|m| u8::try_from(m).ok())
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(Skip::MalformedPeriod)?;

        Ok(DelayRecord {
            location: location.to_string(),
            carrier: carrier.to_string(),
            year,
            month: month.number_from_month(),
            latitude,
            longitude,
            metrics: self.metric_bundle(),
        })
    }

    fn metric_bundle(&self) -> MetricBundle {
        let mut bundle = MetricBundle::default();
        for field in Field::ALL {
            bundle.set(field, coalesce_to_zero(self.cell(field)));
        }
        bundle
    }

    fn cell(&self, field: Field) -> &str {
        match field {
            Field::ArrFlights => &self.arr_flights,
            Field::ArrDel15 => &self.arr_del15,
            Field::CarrierCt => &self.carrier_ct,
            Field::WeatherCt => &self.weather_ct,
            Field::NasCt => &self.nas_ct,
            Field::SecurityCt => &self.security_ct,
            Field::LateAircraftCt => &self.late_aircraft_ct,
            Field::ArrCancelled => &self.arr_cancelled,
            Field::ArrDiverted => &self.arr_diverted,
            Field::ArrDelay => &self.arr_delay,
            Field::CarrierDelay => &self.carrier_delay,
            Field::WeatherDelay => &self.weather_delay,
            Field::NasDelay => &self.nas_delay,
            Field::SecurityDelay => &self.security_delay,
            Field::LateAircraftDelay => &self.late_aircraft_delay,
        }
    }
}
