use serde::{Deserialize, Serialize};

/// An inclusive year range. A range whose start is after its end is empty.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct YearRange(pub i32, pub i32);

impl YearRange {
    /// A range covering exactly one year.
    pub fn single(year: i32) -> Self {
        YearRange(year, year)
    }

    pub fn start(&self) -> i32 {
        self.0
    }

    pub fn end(&self) -> i32 {
        self.1
    }

    pub fn is_empty(&self) -> bool {
        self.0 > self.1
    }
}
