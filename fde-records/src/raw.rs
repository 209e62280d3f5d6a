//! Raw delay rows as they appear in the CSV export.
//!
//! Every column is kept as text. Coercion to numbers happens in
//! [`RawRecord::normalize`](crate::record), so a cell holding `"12"`,
//! `"12.0"` or `""` is handled by one set of rules regardless of how the
//! export was produced.
//!
//! # CSV Format
//!
//! Headers are required. The columns used are:
//!
//! ```text
//! year,month,carrier_name,airport_name,latitude,longitude,arr_flights,arr_del15,
//! carrier_ct,weather_ct,nas_ct,security_ct,late_aircraft_ct,arr_cancelled,
//! arr_diverted,arr_delay,carrier_delay,weather_delay,nas_delay,security_delay,
//! late_aircraft_delay
//! ```
//!
//! Extra columns (for example the two-letter `carrier` and `airport` codes of
//! the BTS export) are ignored; missing columns read as empty cells.

use serde::{Deserialize, Serialize};
use std::io::Read;

/// One reporting-period observation, before validation.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "airport_name", alias = "entityLocationName")]
    pub location: String,
    #[serde(rename = "carrier_name", alias = "entityCarrierName")]
    pub carrier: String,
    pub year: String,
    pub month: String,
    #[serde(alias = "lat")]
    pub latitude: String,
    #[serde(alias = "lon")]
    pub longitude: String,
    pub arr_flights: String,
    pub arr_del15: String,
    pub carrier_ct: String,
    pub weather_ct: String,
    pub nas_ct: String,
    pub security_ct: String,
    pub late_aircraft_ct: String,
    pub arr_cancelled: String,
    pub arr_diverted: String,
    pub arr_delay: String,
    pub carrier_delay: String,
    pub weather_delay: String,
    pub nas_delay: String,
    pub security_delay: String,
    pub late_aircraft_delay: String,
}

/// Read raw records from any CSV source with a header row.
///
/// Rows are not validated here beyond CSV structure; a malformed CSV
/// (unterminated quote, invalid UTF-8) is an error, while odd cell values
/// are left for the normalizer to coerce or skip.
pub fn read_raw_records<R: Read>(reader: R) -> anyhow::Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: RawRecord = result?;
        records.push(record);
    }
    log::info!("[FDE Debug] reader: Read {} raw rows", records.len());
    Ok(records)
}

/// Read raw records from a CSV string.
///
/// # Example
///
/// ```rust
/// use fde_records::raw::parse_raw_records;
///
/// let csv = "airport_name,carrier_name,year,month,latitude,longitude,carrier_delay\n\
///            JFK,Delta,2019,1,40.6413,-73.7781,30\n";
/// let rows = parse_raw_records(csv).unwrap();
/// assert_eq!(rows[0].location, "JFK");
/// assert_eq!(rows[0].carrier_delay, "30");
/// ```
pub fn parse_raw_records(csv_data: &str) -> anyhow::Result<Vec<RawRecord>> {
    read_raw_records(csv_data.as_bytes())
}
