use serde::{Deserialize, Serialize};

/// An airport or carrier with the point used to place it on a map.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct EntityLocation {
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl EntityLocation {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        EntityLocation {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
