//! Reading data files from disk.

use anyhow::Context;
use fde_geo::{parse_feature_collection, RegionFilter};
use fde_index::DelayIndex;
use fde_records::raw::read_raw_records;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open `path` for reading, decompressing `.gz` files on the fly.
pub fn open_data_file(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    if is_gzip(path) {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load a delay CSV and build both indices.
pub fn load_index(path: &Path) -> anyhow::Result<DelayIndex> {
    let rows = read_raw_records(open_data_file(path)?)
        .with_context(|| format!("Failed to read delay records from {}", path.display()))?;
    let index = DelayIndex::from_raw(rows);
    log::info!(
        "[FDE Debug] loader: Loaded {} airports and {} carriers from {}",
        index.by_airport().len(),
        index.by_carrier().len(),
        path.display()
    );
    Ok(index)
}

/// Load state boundaries from a GeoJSON file.
pub fn load_boundaries(path: &Path) -> anyhow::Result<RegionFilter> {
    let mut geojson = String::new();
    open_data_file(path)?
        .read_to_string(&mut geojson)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let features = parse_feature_collection(&geojson)
        .with_context(|| format!("Failed to load boundaries from {}", path.display()))?;
    Ok(RegionFilter::new(features))
}
