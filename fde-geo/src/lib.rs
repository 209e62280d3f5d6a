//! Region selection for map views.
//!
//! A [`filter::RegionFilter`] holds the state boundaries loaded from a
//! GeoJSON basemap and answers which entities fall inside the states of a
//! [`regions::Region`].

pub mod feature;
pub mod filter;
pub mod regions;

pub use feature::{parse_feature_collection, RegionFeature};
pub use filter::RegionFilter;
pub use regions::{Region, RegionSelector};
