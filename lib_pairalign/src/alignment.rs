use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use noisy_float::types::{R64, r64};
use num_traits::Zero;

use crate::{
    error::{Error, Result},
    gap_penalty::GapPenalty,
    score::Score,
    sequence::CodedSequence,
    substitution_matrix::SubstitutionMatrix,
};

/// One column of an alignment, as indices into the first and the second sequence.
///
/// `None` marks a gap in the respective sequence.
pub type TraceEntry = (Option<usize>, Option<usize>);

/// A pairwise alignment of two coded sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Alignment {
    sequence1: CodedSequence,
    sequence2: CodedSequence,
    trace: Vec<TraceEntry>,
    score: Score,
}

/// The denominator used by [`Alignment::identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityMode {
    /// Columns where both sequences have a symbol.
    #[default]
    Aligned,
    /// All columns between the first and the last column where both sequences have a symbol.
    NotTerminal,
    /// All columns.
    All,
    /// The length of the shorter sequence.
    Shortest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Aligned,
    GapInFirst,
    GapInSecond,
}

impl Alignment {
    /// Creates an alignment without validating the trace.
    ///
    /// Traces built outside of this crate are validated by [`Self::rescore`].
    pub fn new(
        sequence1: CodedSequence,
        sequence2: CodedSequence,
        trace: Vec<TraceEntry>,
        score: Score,
    ) -> Self {
        Self {
            sequence1,
            sequence2,
            trace,
            score,
        }
    }

    pub fn sequence1(&self) -> &CodedSequence {
        &self.sequence1
    }

    pub fn sequence2(&self) -> &CodedSequence {
        &self.sequence2
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// The symbols of each column, `None` where a sequence has a gap.
    pub fn symbols(&self) -> Vec<(Option<u8>, Option<u8>)> {
        self.trace
            .iter()
            .map(|&(first, second)| {
                (
                    first.map(|index| self.sequence1.symbol(index)),
                    second.map(|index| self.sequence2.symbol(index)),
                )
            })
            .collect()
    }

    pub fn cigar(&self) -> String {
        let mut result = String::new();
        self.write_cigar(&mut result).unwrap();
        result
    }

    /// Writes the run-length encoded column types.
    ///
    /// `M` is an aligned pair, `I` a gap in the first sequence
    /// and `D` a gap in the second sequence.
    /// Columns without any symbol are skipped.
    pub fn write_cigar(&self, writer: &mut impl Write) -> FmtResult {
        let mut columns = self
            .trace
            .iter()
            .filter_map(|&entry| ColumnType::of(entry))
            .peekable();

        while let Some(column_type) = columns.next() {
            let mut amount = 1;
            while columns.next_if_eq(&column_type).is_some() {
                amount += 1;
            }
            write!(writer, "{amount}{column_type}")?;
        }

        Ok(())
    }

    /// The fraction of identical symbol pairs over the denominator selected by `mode`.
    ///
    /// Returns zero if the denominator is zero.
    pub fn identity(&self, mode: IdentityMode) -> R64 {
        let aligned_columns: Vec<_> = self
            .trace
            .iter()
            .enumerate()
            .filter_map(|(column, &(first, second))| Some((column, first?, second?)))
            .collect();
        let identities = aligned_columns
            .iter()
            .filter(|&&(_, first, second)| {
                self.sequence1.symbol(first) == self.sequence2.symbol(second)
            })
            .count();

        let denominator = match mode {
            IdentityMode::Aligned => aligned_columns.len(),
            IdentityMode::NotTerminal => match (aligned_columns.first(), aligned_columns.last()) {
                (Some(&(start, ..)), Some(&(end, ..))) => end - start + 1,
                _ => 0,
            },
            IdentityMode::All => self.trace.len(),
            IdentityMode::Shortest => self.sequence1.len().min(self.sequence2.len()),
        };

        if denominator == 0 {
            R64::default()
        } else {
            r64(identities as f64 / denominator as f64)
        }
    }

    /// Computes the score of this alignment's trace under the given scoring.
    ///
    /// If `terminal_penalty` is false, gap columns are free while the gapped sequence
    /// has not been entered yet or has been consumed completely.
    /// With an affine gap penalty, a run of gap columns in the same sequence is one gap.
    ///
    /// Fails if a trace column does not consume the next symbol of at least one sequence.
    pub fn rescore(
        &self,
        substitution_matrix: &SubstitutionMatrix,
        gap_penalty: &GapPenalty,
        terminal_penalty: bool,
    ) -> Result<Score> {
        substitution_matrix.check_alphabets(&self.sequence1, &self.sequence2)?;
        gap_penalty.check()?;
        gap_penalty.check_score_range(substitution_matrix, self.trace.len(), 0)?;

        // The amount of symbols of each sequence that precede the current column.
        let mut consumed1 = self.trace.iter().find_map(|&(first, _)| first).unwrap_or(0);
        let mut consumed2 = self.trace.iter().find_map(|&(_, second)| second).unwrap_or(0);
        let mut previous = None;
        let mut score = Score::zero();

        for (column, &entry) in self.trace.iter().enumerate() {
            let column_type = self.check_column(column, entry, consumed1, consumed2)?;
            let is_first = previous != Some(column_type);
            score += match (column_type, entry) {
                (ColumnType::Aligned, (Some(first), Some(second))) => substitution_matrix.score(
                    self.sequence1.codes()[first],
                    self.sequence2.codes()[second],
                ),
                (ColumnType::GapInFirst, _)
                    if !terminal_penalty
                        && (consumed1 == 0 || consumed1 == self.sequence1.len()) =>
                {
                    Score::zero()
                }
                (ColumnType::GapInSecond, _)
                    if !terminal_penalty
                        && (consumed2 == 0 || consumed2 == self.sequence2.len()) =>
                {
                    Score::zero()
                }
                _ => gap_penalty.gap_score(is_first),
            };

            if let Some(first) = entry.0 {
                consumed1 = first + 1;
            }
            if let Some(second) = entry.1 {
                consumed2 = second + 1;
            }
            previous = Some(column_type);
        }

        Ok(score)
    }

    /// Checks that a trace column continues at the next symbols of both sequences.
    fn check_column(
        &self,
        column: usize,
        entry: TraceEntry,
        next1: usize,
        next2: usize,
    ) -> Result<ColumnType> {
        let continues = |index: Option<usize>, next: usize, length: usize| {
            index.is_none_or(|index| index == next && index < length)
        };

        if !continues(entry.0, next1, self.sequence1.len())
            || !continues(entry.1, next2, self.sequence2.len())
        {
            return Err(Error::InvalidTrace {
                column,
                reason: format!(
                    "expected indices ({next1}, {next2}) within lengths ({}, {}), but got {entry:?}",
                    self.sequence1.len(),
                    self.sequence2.len(),
                ),
            });
        }

        ColumnType::of(entry).ok_or_else(|| Error::InvalidTrace {
            column,
            reason: "the column contains no symbol".to_string(),
        })
    }
}

impl ColumnType {
    fn of(entry: TraceEntry) -> Option<Self> {
        match entry {
            (Some(_), Some(_)) => Some(Self::Aligned),
            (None, Some(_)) => Some(Self::GapInFirst),
            (Some(_), None) => Some(Self::GapInSecond),
            (None, None) => None,
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Aligned => write!(f, "M"),
            Self::GapInFirst => write!(f, "I"),
            Self::GapInSecond => write!(f, "D"),
        }
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let symbols = self.symbols();

        for (first, _) in &symbols {
            write!(f, "{}", first.map(char::from).unwrap_or('-'))?;
        }
        writeln!(f)?;
        for (_, second) in &symbols {
            write!(f, "{}", second.map(char::from).unwrap_or('-'))?;
        }

        Ok(())
    }
}
