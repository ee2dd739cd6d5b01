use crate::{
    error::{Error, Result},
    score::Score,
    substitution_matrix::SubstitutionMatrix,
};

/// The penalty charged for gap columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapPenalty {
    /// Every gap column costs the same.
    General(Score),

    /// The first column of a gap costs `open`, every further column costs `extend`.
    Affine { open: Score, extend: Score },
}

impl GapPenalty {
    pub fn general(penalty: i32) -> Result<Self> {
        check_negative("gap penalty", penalty)?;
        Ok(Self::General(penalty.into()))
    }

    pub fn affine(open: i32, extend: i32) -> Result<Self> {
        check_negative("gap opening penalty", open)?;
        check_negative("gap extension penalty", extend)?;
        Ok(Self::Affine {
            open: open.into(),
            extend: extend.into(),
        })
    }

    pub fn is_affine(&self) -> bool {
        matches!(self, Self::Affine { .. })
    }

    /// The penalty of a gap column, given whether it is the first column of its gap.
    pub fn gap_score(&self, is_first: bool) -> Score {
        match *self {
            Self::General(penalty) => penalty,
            Self::Affine { open, .. } if is_first => open,
            Self::Affine { extend, .. } => extend,
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match *self {
            Self::General(penalty) => check_negative("gap penalty", penalty.as_i32()),
            Self::Affine { open, extend } => {
                check_negative("gap opening penalty", open.as_i32())?;
                check_negative("gap extension penalty", extend.as_i32())
            }
        }
    }

    /// Checks that no alignment of up to `columns` columns can overflow a [`Score`].
    ///
    /// Below the most negative alignment score, one more column and another `headroom` must fit,
    /// such that table sentinels stay below all real scores.
    pub(crate) fn check_score_range(
        &self,
        substitution_matrix: &SubstitutionMatrix,
        columns: usize,
        headroom: i64,
    ) -> Result<()> {
        let gap_magnitude = [self.gap_score(true), self.gap_score(false)]
            .into_iter()
            .map(|score| i64::from(score.as_i32()).abs())
            .max()
            .unwrap_or(0);
        let column_magnitude = substitution_matrix.max_magnitude().max(gap_magnitude);
        Score::check_range(
            columns,
            column_magnitude,
            headroom.saturating_add(column_magnitude),
        )
    }
}

impl TryFrom<&[i32]> for GapPenalty {
    type Error = Error;

    fn try_from(value: &[i32]) -> Result<Self> {
        match *value {
            [penalty] => Self::general(penalty),
            [open, extend] => Self::affine(open, extend),
            _ => Err(Error::InvalidGapPenalty {
                reason: format!(
                    "expected a single penalty or a pair of opening and extension penalties, but got {} values",
                    value.len()
                ),
            }),
        }
    }
}

impl Default for GapPenalty {
    fn default() -> Self {
        Self::General((-10).into())
    }
}

fn check_negative(kind: &str, value: i32) -> Result<()> {
    if value < 0 {
        Ok(())
    } else {
        Err(Error::InvalidGapPenalty {
            reason: format!("the {kind} must be negative, but is {value}"),
        })
    }
}
