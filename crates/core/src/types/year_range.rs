//! Inclusive model-year ranges.
//!
//! A vehicle variant covers a contiguous span of model years sharing one
//! fitment profile. Ranges are stored as endpoints, never one row per year;
//! [`expand_years`] produces the discrete year set when a picker needs it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`YearRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum YearRangeError {
    /// The start year is after the end year.
    #[error("inverted year range: {from} > {to}")]
    Inverted { from: i32, to: i32 },
}

/// An inclusive span of model years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    from: i32,
    to: i32,
}

impl YearRange {
    /// Create a range covering `from..=to`.
    ///
    /// # Errors
    ///
    /// Returns [`YearRangeError::Inverted`] if `from > to`.
    pub const fn new(from: i32, to: i32) -> Result<Self, YearRangeError> {
        if from > to {
            return Err(YearRangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// First covered model year.
    #[must_use]
    pub const fn from_year(&self) -> i32 {
        self.from
    }

    /// Last covered model year.
    #[must_use]
    pub const fn to_year(&self) -> i32 {
        self.to
    }

    /// Whether `year` falls inside the range (inclusive).
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    /// Iterate the covered years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.from..=self.to
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Expand a set of ranges into the distinct years they cover, most recent
/// first. Overlapping and adjacent ranges collapse into one deduplicated set.
#[must_use]
pub fn expand_years<I>(ranges: I) -> Vec<i32>
where
    I: IntoIterator<Item = YearRange>,
{
    let mut years: Vec<i32> = ranges.into_iter().flat_map(|r| r.years()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: i32, to: i32) -> YearRange {
        YearRange::new(from, to).expect("valid range")
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            YearRange::new(2020, 2016),
            Err(YearRangeError::Inverted {
                from: 2020,
                to: 2016
            })
        );
    }

    #[test]
    fn single_year_range_is_valid() {
        let r = range(2018, 2018);
        assert_eq!(r.years().collect::<Vec<_>>(), vec![2018]);
        assert!(r.contains(2018));
        assert!(!r.contains(2019));
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let r = range(2016, 2021);
        assert!(r.contains(2016));
        assert!(r.contains(2021));
        assert!(!r.contains(2015));
        assert!(!r.contains(2022));
    }

    #[test]
    fn expands_adjacent_ranges_descending() {
        let years = expand_years([range(2016, 2019), range(2020, 2021)]);
        assert_eq!(years, vec![2021, 2020, 2019, 2018, 2017, 2016]);
    }

    #[test]
    fn expands_overlapping_ranges_without_duplicates() {
        let years = expand_years([range(2016, 2018), range(2017, 2020)]);
        assert_eq!(years, vec![2020, 2019, 2018, 2017, 2016]);
    }

    #[test]
    fn expansion_of_nothing_is_empty() {
        assert!(expand_years([]).is_empty());
    }

    #[test]
    fn display_shows_endpoints() {
        assert_eq!(range(2016, 2021).to_string(), "2016-2021");
    }
}
