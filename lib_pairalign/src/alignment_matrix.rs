use index::AlignmentMatrixIndex;
use log::debug;
use ndarray::Array2;
use num_traits::Zero;
use transition_set::{Transition, TransitionSet};

use crate::{
    score::Score,
    sequence::CodedSequence,
    substitution_matrix::SubstitutionMatrix,
    traceback::TraceTable,
};

pub mod affine;
pub mod index;
pub mod transition_set;

/// Score and trace tables for alignment with a general gap penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    scores: Array2<Score>,
    traces: Array2<TransitionSet<Direction>>,
    gap_penalty: Score,
    terminal_penalty: bool,
    local: bool,
}

/// The step that leads into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Both sequences advance, their symbols are aligned.
    Diagonal,
    /// Only the second sequence advances, the first sequence has a gap.
    Left,
    /// Only the first sequence advances, the second sequence has a gap.
    Top,
}

impl Transition for Direction {
    const ALL: &'static [Self] = &[Self::Diagonal, Self::Left, Self::Top];

    fn index(self) -> usize {
        self as usize
    }
}

impl AlignmentMatrix {
    pub fn new(
        gap_penalty: Score,
        terminal_penalty: bool,
        local: bool,
        first_length: usize,
        second_length: usize,
    ) -> Self {
        Self {
            scores: Array2::default((first_length + 1, second_length + 1)),
            traces: Array2::default((first_length + 1, second_length + 1)),
            gap_penalty,
            terminal_penalty,
            local,
        }
    }

    pub fn scores(&self) -> &Array2<Score> {
        &self.scores
    }

    pub fn traces(&self) -> &Array2<TransitionSet<Direction>> {
        &self.traces
    }

    /// Fills the tables and returns the score of the bottom-right cell.
    pub fn align(
        &mut self,
        first: &CodedSequence,
        second: &CodedSequence,
        substitution_matrix: &SubstitutionMatrix,
    ) -> Score {
        debug_assert_eq!(self.scores.dim(), (first.len() + 1, second.len() + 1));
        debug!(
            "Filling general gap penalty tables of shape {:?}",
            self.scores.dim()
        );

        self.initialise();
        self.align_inner(first, second, substitution_matrix);
        self.scores[[self.scores.dim().0 - 1, self.scores.dim().1 - 1]]
    }

    fn initialise(&mut self) {
        // Initialise matrix origin.
        self.scores[[0, 0]] = Score::zero();
        self.traces[[0, 0]] = TransitionSet::new();

        // Initialise matrix edges.
        let (rows, columns) = self.scores.dim();
        for index in AlignmentMatrixIndex::column_cells(0, rows).skip(1) {
            self.set_boundary_entry(index, Direction::Top);
        }
        for index in AlignmentMatrixIndex::row_cells(0, columns).skip(1) {
            self.set_boundary_entry(index, Direction::Left);
        }
    }

    fn set_boundary_entry(&mut self, index: AlignmentMatrixIndex, direction: Direction) {
        if self.local {
            self.scores[index] = Score::zero();
            self.traces[index] = TransitionSet::new();
        } else {
            self.scores[index] =
                self.scores[index.predecessor(direction)] + self.gap_score(true);
            self.traces[index] = [direction].into();
        }
    }

    fn align_inner(
        &mut self,
        first: &CodedSequence,
        second: &CodedSequence,
        substitution_matrix: &SubstitutionMatrix,
    ) {
        for index in AlignmentMatrixIndex::inner_cells(self.scores.dim()) {
            self.set_max_score(index, first, second, substitution_matrix);
        }
    }

    fn set_max_score(
        &mut self,
        index: AlignmentMatrixIndex,
        first: &CodedSequence,
        second: &CodedSequence,
        substitution_matrix: &SubstitutionMatrix,
    ) {
        let (last_first, last_second) = (first.len(), second.len());

        let diagonal = self.scores[index.diagonal_predecessor()]
            + substitution_matrix.score(
                first.codes()[index.first - 1],
                second.codes()[index.second - 1],
            );
        let left =
            self.scores[index.left_predecessor()] + self.gap_score(index.first == last_first);
        let top =
            self.scores[index.top_predecessor()] + self.gap_score(index.second == last_second);

        let (score, directions) = TransitionSet::best([
            (Direction::Diagonal, diagonal),
            (Direction::Left, left),
            (Direction::Top, top),
        ]);

        if self.local && score <= Score::zero() {
            self.scores[index] = Score::zero();
            self.traces[index] = TransitionSet::new();
        } else {
            self.scores[index] = score;
            self.traces[index] = directions;
        }
    }

    /// The score of a gap column.
    ///
    /// Gaps at the sequence ends are free if terminal penalties are disabled.
    fn gap_score(&self, is_terminal: bool) -> Score {
        if is_terminal && !self.terminal_penalty {
            Score::zero()
        } else {
            self.gap_penalty
        }
    }

    #[cfg(test)]
    fn manual_debug_fill(
        &mut self,
        entries: impl IntoIterator<Item = (Score, TransitionSet<Direction>)>,
    ) {
        let mut entries = entries.into_iter();
        for index in AlignmentMatrixIndex::inner_cells(self.scores.dim()) {
            let (score, directions) = entries.next().unwrap();
            self.scores[index] = score;
            self.traces[index] = directions;
        }
        assert!(entries.next().is_none());
    }
}

impl TraceTable for AlignmentMatrix {
    type State = ();

    fn start_cells(&self) -> (Score, Vec<(AlignmentMatrixIndex, Self::State)>) {
        let (rows, columns) = self.scores.dim();

        if self.local {
            let best = self.scores.iter().max().copied().unwrap_or(Score::zero());
            let start_cells = self
                .scores
                .indexed_iter()
                .filter(|(_, score)| **score == best)
                .map(|((first, second), _)| (AlignmentMatrixIndex::new(first, second), ()))
                .collect();
            (best, start_cells)
        } else {
            let corner = AlignmentMatrixIndex::new(rows - 1, columns - 1);
            (self.scores[corner], vec![(corner, ())])
        }
    }

    fn predecessors(
        &self,
        index: AlignmentMatrixIndex,
        (): Self::State,
    ) -> impl Iterator<Item = (Direction, Self::State)> {
        self.traces[index].iter().map(|direction| (direction, ()))
    }
}

impl core::fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut score_column_widths = vec![0; self.scores.dim().1];
        for first in 0..self.scores.dim().0 {
            for (second, score_column_width) in score_column_widths.iter_mut().enumerate() {
                let width = self.scores[[first, second]].to_string().len();
                *score_column_width = width.max(*score_column_width);
            }
        }

        for first in 0..self.scores.dim().0 {
            write!(f, "[ ")?;
            #[allow(clippy::needless_range_loop)]
            for second in 0..self.scores.dim().1 {
                write!(
                    f,
                    "{: >width$}",
                    self.scores[[first, second]],
                    width = score_column_widths[second],
                )?;
                let directions = self.traces[[first, second]];
                for (direction, symbol) in [
                    (Direction::Diagonal, "D"),
                    (Direction::Left, "L"),
                    (Direction::Top, "T"),
                ] {
                    write!(
                        f,
                        "{}",
                        if directions.contains(direction) {
                            symbol
                        } else {
                            "."
                        }
                    )?;
                }
                write!(f, " ")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;

    use crate::{
        alignment_matrix::{Direction, transition_set::TransitionSet},
        alphabet::Alphabet,
        score::Score,
        sequence::CodedSequence,
        substitution_matrix::SubstitutionMatrix,
    };

    use super::AlignmentMatrix;

    fn nucleotides(symbols: &[u8]) -> CodedSequence {
        CodedSequence::from_symbols(Alphabet::nucleotide(), symbols).unwrap()
    }

    #[test]
    fn test_simple_alignments() {
        let substitution_matrix =
            SubstitutionMatrix::new_base_agnostic("simple", Alphabet::nucleotide(), 1, -1);
        let first = nucleotides(b"ACG");
        let second = nucleotides(b"ACCG");

        let mut matrix =
            AlignmentMatrix::new(Score::new(-2), true, false, first.len(), second.len());
        assert_eq!(matrix.align(&first, &second, &substitution_matrix), Score::new(1));

        use Direction::{Diagonal as D, Left as L, Top as T};
        let mut manual_matrix = matrix.clone();
        manual_matrix.manual_debug_fill(
            [
                (1, vec![D]),
                (-1, vec![L]),
                (-3, vec![L]),
                (-5, vec![L]),
                (-1, vec![T]),
                (2, vec![D]),
                (0, vec![D, L]),
                (-2, vec![L]),
                (-3, vec![T]),
                (0, vec![T]),
                (1, vec![D]),
                (1, vec![D]),
            ]
            .into_iter()
            .map(|(score, directions)| {
                (
                    Score::new(score),
                    directions.into_iter().collect::<TransitionSet<_>>(),
                )
            }),
        );
        assert_eq!(
            matrix, manual_matrix,
            "matrix:\n{matrix}\nmanual_matrix:\n{manual_matrix}"
        );

        let first = nucleotides(b"ACCCGT");
        let second = nucleotides(b"ACCGT");
        let mut matrix =
            AlignmentMatrix::new(Score::new(-2), true, false, first.len(), second.len());
        assert_eq!(matrix.align(&first, &second, &substitution_matrix), Score::new(3));

        let first = nucleotides(b"ACGCCCCCT");
        let second = nucleotides(b"ACCCCCGCT");
        let mut matrix =
            AlignmentMatrix::new(Score::new(-2), true, false, first.len(), second.len());
        assert_eq!(matrix.align(&first, &second, &substitution_matrix), Score::new(5));
    }

    #[test]
    fn boundaries() {
        let substitution_matrix =
            SubstitutionMatrix::new_base_agnostic("simple", Alphabet::nucleotide(), 1, -1);
        let first = nucleotides(b"AC");
        let second = nucleotides(b"GTA");

        let mut matrix = AlignmentMatrix::new(Score::new(-3), true, false, 2, 3);
        matrix.align(&first, &second, &substitution_matrix);
        assert_eq!(matrix.scores()[[0, 3]], Score::new(-9));
        assert_eq!(matrix.scores()[[2, 0]], Score::new(-6));
        assert_eq!(matrix.traces()[[0, 2]], [Direction::Left].into());
        assert_eq!(matrix.traces()[[1, 0]], [Direction::Top].into());
        assert!(matrix.traces()[[0, 0]].is_empty());

        let mut matrix = AlignmentMatrix::new(Score::new(-3), false, false, 2, 3);
        matrix.align(&first, &second, &substitution_matrix);
        assert_eq!(matrix.scores()[[0, 3]], Score::zero());
        assert_eq!(matrix.scores()[[2, 0]], Score::zero());
        assert_eq!(matrix.traces()[[0, 2]], [Direction::Left].into());

        let mut matrix = AlignmentMatrix::new(Score::new(-3), true, true, 2, 3);
        matrix.align(&first, &second, &substitution_matrix);
        assert_eq!(matrix.scores()[[0, 3]], Score::zero());
        assert!(matrix.traces()[[0, 2]].is_empty());
        assert!(matrix.traces()[[1, 0]].is_empty());
    }

    #[test]
    fn local_clamps_to_zero() {
        let substitution_matrix =
            SubstitutionMatrix::new_base_agnostic("simple", Alphabet::nucleotide(), 2, -3);
        let first = nucleotides(b"AT");
        let second = nucleotides(b"GA");

        let mut matrix = AlignmentMatrix::new(Score::new(-2), true, true, 2, 2);
        matrix.align(&first, &second, &substitution_matrix);
        // A/G mismatch
        assert_eq!(matrix.scores()[[1, 1]], Score::zero());
        assert!(matrix.traces()[[1, 1]].is_empty());
        // A/A match
        assert_eq!(matrix.scores()[[1, 2]], Score::new(2));
        assert_eq!(matrix.traces()[[1, 2]], [Direction::Diagonal].into());
        // T below the match, gap in the second sequence
        assert_eq!(matrix.scores()[[2, 2]], Score::zero());
        assert!(matrix.traces()[[2, 2]].is_empty());
    }
}
