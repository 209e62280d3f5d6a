use crate::feature::RegionFeature;
use crate::regions::RegionSelector;
use fde_records::location::EntityLocation;
use geo::{Intersects, Point};

/// Filters entities by membership in the states of a region.
///
/// Boundaries are loaded once and never modified; the selected subset is
/// recomputed on every call.
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    features: Vec<RegionFeature>,
}

impl RegionFilter {
    pub fn new(features: Vec<RegionFeature>) -> Self {
        RegionFilter { features }
    }

    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    /// Boundaries whose name belongs to the selected region.
    pub fn boundaries(&self, selector: RegionSelector) -> Vec<&RegionFeature> {
        self.features
            .iter()
            .filter(|feature| selector.admits_state(&feature.name))
            .collect()
    }

    /// Entities whose point lies inside or on at least one selected
    /// boundary.
    ///
    /// Entities with non-finite coordinates are always dropped. With
    /// [`RegionSelector::All`] no polygon test is run, so entities outside
    /// every loaded boundary still pass.
    pub fn filter(
        &self,
        entities: &[EntityLocation],
        selector: RegionSelector,
    ) -> Vec<EntityLocation> {
        let candidates = entities.iter().filter(|e| e.has_finite_coordinates());
        let kept: Vec<EntityLocation> = match selector {
            RegionSelector::All => candidates.cloned().collect(),
            RegionSelector::Only(_) => {
                let boundaries = self.boundaries(selector);
                candidates
                    .filter(|entity| {
                        let point = Point::new(entity.longitude, entity.latitude);
                        boundaries
                            .iter()
                            .any(|feature| feature.geometry.intersects(&point))
                    })
                    .cloned()
                    .collect()
            }
        };
        log::debug!(
            "[FDE Debug] region: {} of {} entities in {}",
            kept.len(),
            entities.len(),
            selector
        );
        kept
    }
}
