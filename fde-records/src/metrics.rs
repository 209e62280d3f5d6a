use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// Summable flight and delay counters for one (entity, year, month,
/// counterpart) cell.
///
/// Counts are `f64`: delay-cause counts in BTS exports are apportioned
/// across causes and are routinely fractional.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub arr_flights: f64,
    pub arr_del15: f64,
    pub carrier_ct: f64,
    pub weather_ct: f64,
    pub nas_ct: f64,
    pub security_ct: f64,
    pub late_aircraft_ct: f64,
    pub arr_cancelled: f64,
    pub arr_diverted: f64,
    /// Total arrival delay in minutes.
    pub arr_delay: f64,
    pub carrier_delay: f64,
    pub weather_delay: f64,
    pub nas_delay: f64,
    pub security_delay: f64,
    pub late_aircraft_delay: f64,
}

/// Names one numeric column of a [`MetricBundle`].
///
/// The string form is the CSV column name (`arr_flights`, `carrier_delay`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ArrFlights,
    ArrDel15,
    CarrierCt,
    WeatherCt,
    NasCt,
    SecurityCt,
    LateAircraftCt,
    ArrCancelled,
    ArrDiverted,
    ArrDelay,
    CarrierDelay,
    WeatherDelay,
    NasDelay,
    SecurityDelay,
    LateAircraftDelay,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::ArrFlights,
        Field::ArrDel15,
        Field::CarrierCt,
        Field::WeatherCt,
        Field::NasCt,
        Field::SecurityCt,
        Field::LateAircraftCt,
        Field::ArrCancelled,
        Field::ArrDiverted,
        Field::ArrDelay,
        Field::CarrierDelay,
        Field::WeatherDelay,
        Field::NasDelay,
        Field::SecurityDelay,
        Field::LateAircraftDelay,
    ];

    /// The CSV column this field is read from.
    pub fn column(&self) -> &'static str {
        match self {
            Field::ArrFlights => "arr_flights",
            Field::ArrDel15 => "arr_del15",
            Field::CarrierCt => "carrier_ct",
            Field::WeatherCt => "weather_ct",
            Field::NasCt => "nas_ct",
            Field::SecurityCt => "security_ct",
            Field::LateAircraftCt => "late_aircraft_ct",
            Field::ArrCancelled => "arr_cancelled",
            Field::ArrDiverted => "arr_diverted",
            Field::ArrDelay => "arr_delay",
            Field::CarrierDelay => "carrier_delay",
            Field::WeatherDelay => "weather_delay",
            Field::NasDelay => "nas_delay",
            Field::SecurityDelay => "security_delay",
            Field::LateAircraftDelay => "late_aircraft_delay",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.column() == wanted)
            .ok_or_else(|| format!("unknown metric field: {s}"))
    }
}

impl MetricBundle {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::ArrFlights => self.arr_flights,
            Field::ArrDel15 => self.arr_del15,
            Field::CarrierCt => self.carrier_ct,
            Field::WeatherCt => self.weather_ct,
            Field::NasCt => self.nas_ct,
            Field::SecurityCt => self.security_ct,
            Field::LateAircraftCt => self.late_aircraft_ct,
            Field::ArrCancelled => self.arr_cancelled,
            Field::ArrDiverted => self.arr_diverted,
            Field::ArrDelay => self.arr_delay,
            Field::CarrierDelay => self.carrier_delay,
            Field::WeatherDelay => self.weather_delay,
            Field::NasDelay => self.nas_delay,
            Field::SecurityDelay => self.security_delay,
            Field::LateAircraftDelay => self.late_aircraft_delay,
        }
    }

    fn slot(&mut self, field: Field) -> &mut f64 {
        match field {
            Field::ArrFlights => &mut self.arr_flights,
            Field::ArrDel15 => &mut self.arr_del15,
            Field::CarrierCt => &mut self.carrier_ct,
            Field::WeatherCt => &mut self.weather_ct,
            Field::NasCt => &mut self.nas_ct,
            Field::SecurityCt => &mut self.security_ct,
            Field::LateAircraftCt => &mut self.late_aircraft_ct,
            Field::ArrCancelled => &mut self.arr_cancelled,
            Field::ArrDiverted => &mut self.arr_diverted,
            Field::ArrDelay => &mut self.arr_delay,
            Field::CarrierDelay => &mut self.carrier_delay,
            Field::WeatherDelay => &mut self.weather_delay,
            Field::NasDelay => &mut self.nas_delay,
            Field::SecurityDelay => &mut self.security_delay,
            Field::LateAircraftDelay => &mut self.late_aircraft_delay,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        *self.slot(field) = value;
    }
}

impl AddAssign<&MetricBundle> for MetricBundle {
    fn add_assign(&mut self, other: &MetricBundle) {
        for field in Field::ALL {
            *self.slot(field) += other.get(field);
        }
    }
}

/// The five reported causes of an arrival delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayCause {
    Carrier,
    Weather,
    Nas,
    Security,
    LateAircraft,
}

impl DelayCause {
    pub const ALL: [DelayCause; 5] = [
        DelayCause::Carrier,
        DelayCause::Weather,
        DelayCause::Nas,
        DelayCause::Security,
        DelayCause::LateAircraft,
    ];

    /// Number of delayed arrivals attributed to this cause.
    pub fn count_field(&self) -> Field {
        match self {
            DelayCause::Carrier => Field::CarrierCt,
            DelayCause::Weather => Field::WeatherCt,
            DelayCause::Nas => Field::NasCt,
            DelayCause::Security => Field::SecurityCt,
            DelayCause::LateAircraft => Field::LateAircraftCt,
        }
    }

    /// Minutes of delay attributed to this cause.
    pub fn minutes_field(&self) -> Field {
        match self {
            DelayCause::Carrier => Field::CarrierDelay,
            DelayCause::Weather => Field::WeatherDelay,
            DelayCause::Nas => Field::NasDelay,
            DelayCause::Security => Field::SecurityDelay,
            DelayCause::LateAircraft => Field::LateAircraftDelay,
        }
    }

    /// Legend label used by the chart front-ends.
    pub fn label(&self) -> &'static str {
        match self {
            DelayCause::Carrier => "Carrier Delay",
            DelayCause::Weather => "Weather Delay",
            DelayCause::Nas => "NAS Delay",
            DelayCause::Security => "Security Delay",
            DelayCause::LateAircraft => "Late Aircraft Delay",
        }
    }

    pub fn count_fields() -> [Field; 5] {
        DelayCause::ALL.map(|cause| cause.count_field())
    }

    pub fn minutes_fields() -> [Field; 5] {
        DelayCause::ALL.map(|cause| cause.minutes_field())
    }
}

impl fmt::Display for DelayCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DelayCause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "carrier" => Ok(DelayCause::Carrier),
            "weather" => Ok(DelayCause::Weather),
            "nas" => Ok(DelayCause::Nas),
            "security" => Ok(DelayCause::Security),
            "late_aircraft" => Ok(DelayCause::LateAircraft),
            other => Err(format!("unknown delay cause: {other}")),
        }
    }
}
