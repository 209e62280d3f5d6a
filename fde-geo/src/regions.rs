use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of six static groupings of US states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Northeast,
    Southeast,
    Midwest,
    Southwest,
    MountainWest,
    Pacific,
}

const NORTHEAST: &[&str] = &[
    "Connecticut",
    "Delaware",
    "Maine",
    "Maryland",
    "Massachusetts",
    "New Hampshire",
    "New Jersey",
    "New York",
    "Pennsylvania",
    "Rhode Island",
    "Vermont",
];

const SOUTHEAST: &[&str] = &[
    "Alabama",
    "Arkansas",
    "District of Columbia",
    "Florida",
    "Georgia",
    "Kentucky",
    "Louisiana",
    "Mississippi",
    "North Carolina",
    "Puerto Rico",
    "South Carolina",
    "Tennessee",
    "U.S. Virgin Islands",
    "Virginia",
    "West Virginia",
];

const MIDWEST: &[&str] = &[
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Michigan",
    "Minnesota",
    "Missouri",
    "Nebraska",
    "North Dakota",
    "Ohio",
    "South Dakota",
    "Wisconsin",
];

const SOUTHWEST: &[&str] = &["Arizona", "New Mexico", "Oklahoma", "Texas"];

const MOUNTAIN_WEST: &[&str] = &["Colorado", "Idaho", "Montana", "Nevada", "Utah", "Wyoming"];

const PACIFIC: &[&str] = &["Alaska", "California", "Hawaii", "Oregon", "Washington"];

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Northeast,
        Region::Southeast,
        Region::Midwest,
        Region::Southwest,
        Region::MountainWest,
        Region::Pacific,
    ];

    /// Member state names, spelled as in the Census state boundary files.
    pub fn states(&self) -> &'static [&'static str] {
        match self {
            Region::Northeast => NORTHEAST,
            Region::Southeast => SOUTHEAST,
            Region::Midwest => MIDWEST,
            Region::Southwest => SOUTHWEST,
            Region::MountainWest => MOUNTAIN_WEST,
            Region::Pacific => PACIFIC,
        }
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states().contains(&state)
    }

    /// Display name, e.g. "Mountain West".
    pub fn label(&self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Southeast => "Southeast",
            Region::Midwest => "Midwest",
            Region::Southwest => "Southwest",
            Region::MountainWest => "Mountain West",
            Region::Pacific => "Pacific",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Region::Northeast => "northeast",
            Region::Southeast => "southeast",
            Region::Midwest => "midwest",
            Region::Southwest => "southwest",
            Region::MountainWest => "mountain-west",
            Region::Pacific => "pacific",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|region| {
                region.key().eq_ignore_ascii_case(wanted)
                    || region.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown region '{wanted}'"))
    }
}

/// Either every region or exactly one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionSelector {
    #[default]
    All,
    Only(Region),
}

impl RegionSelector {
    /// State names the selector admits; `None` means no restriction.
    pub fn member_states(&self) -> Option<&'static [&'static str]> {
        match self {
            RegionSelector::All => None,
            RegionSelector::Only(region) => Some(region.states()),
        }
    }

    pub fn admits_state(&self, state: &str) -> bool {
        match self {
            RegionSelector::All => true,
            RegionSelector::Only(region) => region.contains_state(state),
        }
    }
}

impl fmt::Display for RegionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionSelector::All => f.write_str("all"),
            RegionSelector::Only(region) => fmt::Display::fmt(region, f),
        }
    }
}

impl FromStr for RegionSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(RegionSelector::All);
        }
        s.parse().map(RegionSelector::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn regions_do_not_overlap() {
        let mut seen = BTreeSet::new();
        for region in Region::ALL {
            for state in region.states() {
                assert!(seen.insert(*state), "{state} is in two regions");
            }
        }
        // 50 states, DC, Puerto Rico and the Virgin Islands.
        assert_eq!(seen.len(), 53);
    }

    #[test]
    fn parse_region_names() {
        assert_eq!("mountain-west".parse::<Region>(), Ok(Region::MountainWest));
        assert_eq!("Mountain West".parse::<Region>(), Ok(Region::MountainWest));
        assert_eq!("PACIFIC".parse::<Region>(), Ok(Region::Pacific));
        assert!("atlantis".parse::<Region>().is_err());
        assert_eq!(Region::MountainWest.to_string(), "mountain-west");
    }

    #[test]
    fn selector_member_states() {
        assert_eq!(RegionSelector::All.member_states(), None);
        let northeast = RegionSelector::Only(Region::Northeast);
        assert!(northeast.member_states().unwrap().contains(&"New York"));
        assert!(northeast.admits_state("Vermont"));
        assert!(!northeast.admits_state("Texas"));
        assert!(RegionSelector::All.admits_state("Texas"));
        assert_eq!("all".parse::<RegionSelector>(), Ok(RegionSelector::All));
        assert_eq!(
            "southwest".parse::<RegionSelector>(),
            Ok(RegionSelector::Only(Region::Southwest))
        );
    }
}
