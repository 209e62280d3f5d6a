//! GeoJSON boundary loading.
//!
//! Only the parts of a `FeatureCollection` needed for region membership are
//! read: a name property and Polygon or MultiPolygon geometry. Positions are
//! `[longitude, latitude]`, as GeoJSON writes them.

use anyhow::{bail, ensure, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Property keys tried, in order, for a feature's state name.
const NAME_KEYS: [&str; 3] = ["NAME", "name", "STATE_NAME"];

/// A named state boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

impl RegionFeature {
    pub fn new(name: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        RegionFeature {
            name: name.into(),
            geometry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Position = Vec<f64>;
type Ring = Vec<Position>;

fn ring_to_line_string(ring: Ring) -> Result<LineString<f64>> {
    let coords = ring
        .into_iter()
        .map(|position| {
            ensure!(
                position.len() >= 2,
                "position has {} values, expected [lon, lat]",
                position.len()
            );
            Ok(Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

fn rings_to_polygon(rings: Vec<Ring>) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter();
    let Some(exterior) = rings.next() else {
        bail!("polygon has no rings");
    };
    let exterior = ring_to_line_string(exterior)?;
    let interiors = rings.map(ring_to_line_string).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

impl RawGeometry {
    /// `Ok(None)` for geometry kinds that cannot bound a region.
    fn into_multi_polygon(self) -> Result<Option<MultiPolygon<f64>>> {
        match self.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Ring> = serde_json::from_value(self.coordinates)
                    .context("Polygon coordinates")?;
                Ok(Some(MultiPolygon::new(vec![rings_to_polygon(rings)?])))
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Ring>> = serde_json::from_value(self.coordinates)
                    .context("MultiPolygon coordinates")?;
                let polygons = polygons
                    .into_iter()
                    .map(rings_to_polygon)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(MultiPolygon::new(polygons)))
            }
            _ => Ok(None),
        }
    }
}

fn feature_name(properties: Option<&Map<String, Value>>) -> Option<String> {
    let properties = properties?;
    NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Parse a GeoJSON `FeatureCollection` into named boundaries.
///
/// Features without a name or with non-areal geometry (points, lines) are
/// skipped. Malformed coordinates on an areal feature are an error.
pub fn parse_feature_collection(geojson: &str) -> Result<Vec<RegionFeature>> {
    let collection: FeatureCollection =
        serde_json::from_str(geojson).context("Failed to parse GeoJSON FeatureCollection")?;

    let total = collection.features.len();
    let mut features = Vec::with_capacity(total);
    for (i, raw) in collection.features.into_iter().enumerate() {
        let Some(name) = feature_name(raw.properties.as_ref()) else {
            log::debug!("[FDE Debug] geojson: feature {} has no name property, skipping", i);
            continue;
        };
        let Some(geometry) = raw.geometry else {
            log::debug!("[FDE Debug] geojson: feature '{}' has no geometry, skipping", name);
            continue;
        };
        let kind = geometry.kind.clone();
        match geometry
            .into_multi_polygon()
            .with_context(|| format!("Invalid geometry for feature '{}'", name))?
        {
            Some(geometry) => features.push(RegionFeature { name, geometry }),
            None => log::debug!(
                "[FDE Debug] geojson: feature '{}' has {} geometry, skipping",
                name,
                kind
            ),
        }
    }

    log::info!(
        "[FDE Debug] geojson: Loaded {} boundaries from {} features",
        features.len(),
        total
    );
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": { "NAME": "Square" },
          "geometry": {
            "type": "Polygon",
            "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]]
          }
        },
        {
          "type": "Feature",
          "properties": { "name": "Islands" },
          "geometry": {
            "type": "MultiPolygon",
            "coordinates": [
              [[[10, 10], [11, 10], [11, 11], [10, 10]]],
              [[[20, 20], [21, 20], [21, 21], [20, 20]]]
            ]
          }
        },
        {
          "type": "Feature",
          "properties": { "NAME": "Capital" },
          "geometry": { "type": "Point", "coordinates": [1, 1] }
        },
        {
          "type": "Feature",
          "properties": { "GEO_ID": "0400000US99" },
          "geometry": {
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
          }
        }
      ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let features = parse_feature_collection(SAMPLE).unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Square", "Islands"]);
        assert_eq!(features[0].geometry.0.len(), 1);
        assert_eq!(features[1].geometry.0.len(), 2);
        assert_eq!(
            features[0].geometry.0[0].exterior().0[1],
            Coord { x: 4.0, y: 0.0 }
        );
    }

    #[test]
    fn rejects_malformed_positions() {
        let bad = r#"{"type":"FeatureCollection","features":[
          {"type":"Feature","properties":{"NAME":"Bad"},
           "geometry":{"type":"Polygon","coordinates":[[[0],[1,1],[0,0]]]}}]}"#;
        assert!(parse_feature_collection(bad).is_err());
    }

    #[test]
    fn rejects_non_collections() {
        assert!(parse_feature_collection("[1, 2, 3]").is_err());
    }
}
