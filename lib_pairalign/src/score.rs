use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use num_traits::{Bounded, Zero};

use crate::error::{Error, Result};

/// The score of an alignment.
///
/// Higher is better. Gap penalties are negative scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score(i32);

impl Score {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// A score that behaves like negative infinity in a table
    /// where at most `headroom` can be added to it without overflowing.
    ///
    /// `headroom` is the magnitude of the most negative sum that may be added to the sentinel.
    /// Callers must ensure that all real scores are above the sentinel,
    /// see [`GapPenalty::check_score_range`](crate::gap_penalty::GapPenalty::check_score_range).
    pub fn negative_infinity(headroom: i64) -> Self {
        let max_headroom = i64::from(Self::max_value().0);
        debug_assert!((0..=max_headroom).contains(&headroom));
        let value = i64::from(Self::min_value().0) + headroom.clamp(0, max_headroom);
        // In range by the clamp above.
        Self(value as i32)
    }

    /// Checks that no alignment of up to `columns` columns can overflow a score.
    ///
    /// `column_magnitude` bounds the magnitude of the score of a single column.
    /// Below the most negative alignment score, another `headroom` must fit for table sentinels.
    pub(crate) fn check_range(columns: usize, column_magnitude: i64, headroom: i64) -> Result<()> {
        let limit = i64::from(Self::max_value().0);
        let required = i64::try_from(columns)
            .unwrap_or(i64::MAX)
            .saturating_mul(column_magnitude)
            .saturating_add(headroom);

        if required <= limit {
            Ok(())
        } else {
            Err(Error::ScoreOutOfRange {
                columns,
                column_magnitude,
                headroom,
                limit,
            })
        }
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<Score> for i32 {
    fn from(value: Score) -> Self {
        value.0
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Zero for Score {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Bounded for Score {
    fn min_value() -> Self {
        Self(i32::MIN)
    }

    fn max_value() -> Self {
        Self(i32::MAX)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use num_traits::{Bounded, Zero};

    use crate::error::Error;

    use super::Score;

    #[test]
    fn negative_infinity_has_headroom() {
        let sentinel = Score::negative_infinity(2 * (10 + 1) + 4);
        assert_eq!(sentinel.as_i32(), i32::MIN + 26);
        assert_eq!(
            (sentinel + Score::new(-10) + Score::new(-1) + Score::new(-4)).as_i32(),
            i32::MIN + 11
        );
    }

    #[test]
    fn negative_infinity_without_headroom() {
        assert_eq!(Score::negative_infinity(0), Score::min_value());
        assert_eq!(
            Score::negative_infinity(i64::from(i32::MAX)),
            Score::new(-1)
        );
        assert!(Score::negative_infinity(1_500_000_000) < Score::zero());
    }

    #[test]
    fn sum() {
        assert_eq!(
            [1, -4, 6].into_iter().map(Score::new).sum::<Score>(),
            Score::new(3)
        );
        assert!(std::iter::empty::<Score>().sum::<Score>().is_zero());
    }

    #[test]
    fn check_range() {
        assert!(Score::check_range(1000, 10, 0).is_ok());
        assert!(Score::check_range(357_913_941, 6, 0).is_ok());
        assert_eq!(
            Score::check_range(357_913_942, 6, 0),
            Err(Error::ScoreOutOfRange {
                columns: 357_913_942,
                column_magnitude: 6,
                headroom: 0,
                limit: i64::from(i32::MAX),
            })
        );
        assert!(Score::check_range(2, 6, i64::from(i32::MAX) - 11).is_err());
        assert!(Score::check_range(usize::MAX, 1, 0).is_err());
        assert!(Score::check_range(usize::MAX, 0, 0).is_ok());
    }
}
