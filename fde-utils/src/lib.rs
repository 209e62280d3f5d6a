//! Shared utility functions for FDE crates.

pub mod years;

/// Lenient numeric coercion for delay CSV cells.
///
/// Delay exports mix integers (`"12"`), floats (`"3.45"`), blanks and the
/// occasional `"NA"`. Count and minute columns coalesce anything unusable to
/// zero; coordinates and periods have no sensible default, so they return
/// `None` instead.
pub mod numbers {
    /// Parse a cell as a finite `f64`, or `None`.
    pub fn parse_finite(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parse a count or minute cell, treating missing and non-numeric as 0.
    pub fn coalesce_to_zero(raw: &str) -> f64 {
        parse_finite(raw).unwrap_or(0.0)
    }

    /// Parse a whole number, accepting float spellings such as `"2019.0"`.
    pub fn parse_whole(raw: &str) -> Option<i64> {
        let value = parse_finite(raw)?;
        if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }

}
