use std::ops::{Index, IndexMut};

use log::debug;
use ndarray::Array2;
use num_traits::Zero;

use super::{
    Direction,
    index::AlignmentMatrixIndex,
    transition_set::{Transition, TransitionSet},
};
use crate::{
    score::Score, sequence::CodedSequence, substitution_matrix::SubstitutionMatrix,
    traceback::TraceTable,
};

/// A state of the three-state affine gap automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// The symbols of both sequences are aligned.
    Match,
    /// The first sequence has a gap, consuming the second sequence.
    Gap1,
    /// The second sequence has a gap, consuming the first sequence.
    Gap2,
}

/// How a gap state was entered.
///
/// A gap state can only be entered from [`State::Match`] or from itself,
/// so a gap in one sequence never directly follows a gap in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GapTransition {
    Open,
    Extend,
}

/// One value per automaton state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateArray<T> {
    entries: [T; 3],
}

/// The trace of one cell, holding the predecessor transitions of each state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AffineTraceEntry {
    pub match_sources: TransitionSet<State>,
    pub gap1_sources: TransitionSet<GapTransition>,
    pub gap2_sources: TransitionSet<GapTransition>,
}

/// Score and trace tables for alignment with an affine gap penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffineAlignmentMatrix {
    scores: StateArray<Array2<Score>>,
    traces: Array2<AffineTraceEntry>,
    gap_open: Score,
    gap_extend: Score,
    terminal_penalty: bool,
    local: bool,
    negative_infinity: Score,
}

impl State {
    pub const ALL: [Self; 3] = [Self::Match, Self::Gap1, Self::Gap2];

    /// The step taken when leaving a cell in this state during traceback.
    pub fn direction(self) -> Direction {
        match self {
            Self::Match => Direction::Diagonal,
            Self::Gap1 => Direction::Left,
            Self::Gap2 => Direction::Top,
        }
    }
}

impl Transition for State {
    const ALL: &'static [Self] = &State::ALL;

    fn index(self) -> usize {
        self as usize
    }
}

impl GapTransition {
    /// The state a gap state was in before this transition.
    pub fn source(self, gap_state: State) -> State {
        debug_assert_ne!(gap_state, State::Match);

        match self {
            Self::Open => State::Match,
            Self::Extend => gap_state,
        }
    }
}

impl Transition for GapTransition {
    const ALL: &'static [Self] = &[Self::Open, Self::Extend];

    fn index(self) -> usize {
        self as usize
    }
}

impl<T> StateArray<T> {
    pub fn from_fn(mut f: impl FnMut(State) -> T) -> Self {
        Self {
            entries: State::ALL.map(&mut f),
        }
    }
}

impl<T> Index<State> for StateArray<T> {
    type Output = T;

    fn index(&self, index: State) -> &Self::Output {
        &self.entries[index as usize]
    }
}

impl<T> IndexMut<State> for StateArray<T> {
    fn index_mut(&mut self, index: State) -> &mut Self::Output {
        &mut self.entries[index as usize]
    }
}

impl AffineTraceEntry {
    /// The predecessor states of `state` in this cell.
    pub fn sources(&self, state: State) -> impl Iterator<Item = State> {
        let (match_sources, gap_sources) = match state {
            State::Match => (self.match_sources, TransitionSet::new()),
            State::Gap1 => (TransitionSet::new(), self.gap1_sources),
            State::Gap2 => (TransitionSet::new(), self.gap2_sources),
        };

        match_sources.iter().chain(
            gap_sources
                .iter()
                .map(move |transition| transition.source(state)),
        )
    }

    fn gap_sources_mut(&mut self, gap_state: State) -> &mut TransitionSet<GapTransition> {
        match gap_state {
            State::Gap1 => &mut self.gap1_sources,
            State::Gap2 => &mut self.gap2_sources,
            State::Match => unreachable!("the match state has no gap sources"),
        }
    }
}

impl AffineAlignmentMatrix {
    pub fn new(
        gap_open: Score,
        gap_extend: Score,
        terminal_penalty: bool,
        local: bool,
        first_length: usize,
        second_length: usize,
        min_substitution_score: Score,
    ) -> Self {
        let negative_infinity = Score::negative_infinity(Self::sentinel_headroom(
            gap_open,
            gap_extend,
            min_substitution_score,
        ));
        let shape = (first_length + 1, second_length + 1);

        Self {
            scores: StateArray::from_fn(|_| Array2::from_elem(shape, negative_infinity)),
            traces: Array2::default(shape),
            gap_open,
            gap_extend,
            terminal_penalty,
            local,
            negative_infinity,
        }
    }

    /// The amount that may be added to the sentinel of the tables without overflowing.
    ///
    /// The sentinel must survive the addition of a gap opening and a gap extension twice,
    /// plus a substitution score.
    pub fn sentinel_headroom(
        gap_open: Score,
        gap_extend: Score,
        min_substitution_score: Score,
    ) -> i64 {
        2 * (i64::from(gap_open.as_i32()).abs() + i64::from(gap_extend.as_i32()).abs())
            + i64::from(min_substitution_score.as_i32().min(0)).abs()
    }

    pub fn scores(&self, state: State) -> &Array2<Score> {
        &self.scores[state]
    }

    pub fn traces(&self) -> &Array2<AffineTraceEntry> {
        &self.traces
    }

    pub fn negative_infinity(&self) -> Score {
        self.negative_infinity
    }

    /// Fills the tables and returns the best score of the bottom-right cell over all states.
    pub fn align(
        &mut self,
        first: &CodedSequence,
        second: &CodedSequence,
        substitution_matrix: &SubstitutionMatrix,
    ) -> Score {
        debug_assert_eq!(self.traces.dim(), (first.len() + 1, second.len() + 1));
        debug!(
            "Filling affine gap penalty tables of shape {:?} with sentinel {}",
            self.traces.dim(),
            self.negative_infinity
        );

        self.initialise();
        self.align_inner(first, second, substitution_matrix);

        let corner = AlignmentMatrixIndex::new(self.traces.dim().0 - 1, self.traces.dim().1 - 1);
        State::ALL
            .into_iter()
            .map(|state| self.scores[state][corner])
            .max()
            .unwrap_or(self.negative_infinity)
    }

    fn initialise(&mut self) {
        let (rows, columns) = self.traces.dim();

        if self.local {
            for index in AlignmentMatrixIndex::column_cells(0, rows) {
                self.scores[State::Match][index] = Score::zero();
            }
            for index in AlignmentMatrixIndex::row_cells(0, columns) {
                self.scores[State::Match][index] = Score::zero();
            }
            return;
        }

        self.scores[State::Match][[0, 0]] = Score::zero();

        // Leading gaps can only be represented on the boundary of their gap state.
        for index in AlignmentMatrixIndex::row_cells(0, columns).skip(1) {
            self.set_gap_entry(index, State::Gap1, true);
        }
        for index in AlignmentMatrixIndex::column_cells(0, rows).skip(1) {
            self.set_gap_entry(index, State::Gap2, true);
        }
    }

    fn align_inner(
        &mut self,
        first: &CodedSequence,
        second: &CodedSequence,
        substitution_matrix: &SubstitutionMatrix,
    ) {
        let (last_first, last_second) = (first.len(), second.len());

        for index in AlignmentMatrixIndex::inner_cells(self.traces.dim()) {
            let substitution_score = substitution_matrix.score(
                first.codes()[index.first - 1],
                second.codes()[index.second - 1],
            );
            self.set_match_entry(index, substitution_score);
            self.set_gap_entry(index, State::Gap1, index.first == last_first);
            self.set_gap_entry(index, State::Gap2, index.second == last_second);
        }
    }

    fn set_match_entry(&mut self, index: AlignmentMatrixIndex, substitution_score: Score) {
        let predecessor = index.diagonal_predecessor();
        let (best, sources) = TransitionSet::best(
            State::ALL
                .into_iter()
                .map(|state| (state, self.scores[state][predecessor])),
        );
        let score = best + substitution_score;

        if self.local && score <= Score::zero() {
            self.scores[State::Match][index] = Score::zero();
            self.traces[index].match_sources = TransitionSet::new();
        } else {
            self.scores[State::Match][index] = score;
            self.traces[index].match_sources = sources;
        }
    }

    /// Sets the entry of a gap state.
    ///
    /// `is_terminal` marks cells on the far boundary of the sequence that has the gap.
    fn set_gap_entry(&mut self, index: AlignmentMatrixIndex, gap_state: State, is_terminal: bool) {
        let predecessor = index.predecessor(gap_state.direction());
        let (score, transitions) = TransitionSet::best(GapTransition::ALL.iter().map(|&transition| {
            (
                transition,
                self.scores[transition.source(gap_state)][predecessor]
                    + self.gap_score(transition, is_terminal),
            )
        }));

        if self.local && score <= Score::zero() {
            self.scores[gap_state][index] = Score::zero();
            *self.traces[index].gap_sources_mut(gap_state) = TransitionSet::new();
        } else {
            self.scores[gap_state][index] = score;
            *self.traces[index].gap_sources_mut(gap_state) = transitions;
        }
    }

    fn gap_score(&self, transition: GapTransition, is_terminal: bool) -> Score {
        if is_terminal && !self.terminal_penalty {
            Score::zero()
        } else {
            match transition {
                GapTransition::Open => self.gap_open,
                GapTransition::Extend => self.gap_extend,
            }
        }
    }
}

impl TraceTable for AffineAlignmentMatrix {
    type State = State;

    fn start_cells(&self) -> (Score, Vec<(AlignmentMatrixIndex, Self::State)>) {
        let (rows, columns) = self.traces.dim();

        if self.local {
            let best = State::ALL
                .into_iter()
                .filter_map(|state| self.scores[state].iter().max().copied())
                .max()
                .unwrap_or(Score::zero());
            let start_cells = self
                .traces
                .indexed_iter()
                .flat_map(|((first, second), _)| {
                    let index = AlignmentMatrixIndex::new(first, second);
                    State::ALL
                        .into_iter()
                        .filter(move |&state| self.scores[state][index] == best)
                        .map(move |state| (index, state))
                })
                .collect();
            (best, start_cells)
        } else {
            let corner = AlignmentMatrixIndex::new(rows - 1, columns - 1);
            let best = State::ALL
                .into_iter()
                .map(|state| self.scores[state][corner])
                .max()
                .unwrap_or(self.negative_infinity);
            let start_cells = State::ALL
                .into_iter()
                .filter(|&state| self.scores[state][corner] == best)
                .map(|state| (corner, state))
                .collect();
            (best, start_cells)
        }
    }

    fn predecessors(
        &self,
        index: AlignmentMatrixIndex,
        state: Self::State,
    ) -> impl Iterator<Item = (Direction, Self::State)> {
        self.traces[index]
            .sources(state)
            .map(move |source| (state.direction(), source))
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Zero;

    use crate::{
        alignment_matrix::{AlignmentMatrix, transition_set::TransitionSet},
        alphabet::Alphabet,
        score::Score,
        sequence::CodedSequence,
        substitution_matrix::SubstitutionMatrix,
    };

    use super::{AffineAlignmentMatrix, AffineTraceEntry, GapTransition, State};

    fn nucleotides(symbols: &[u8]) -> CodedSequence {
        CodedSequence::from_symbols(Alphabet::nucleotide(), symbols).unwrap()
    }

    fn simple_matrix() -> SubstitutionMatrix {
        SubstitutionMatrix::new_base_agnostic("simple", Alphabet::nucleotide(), 6, -4)
    }

    #[test]
    fn boundaries() {
        let first = nucleotides(b"AC");
        let second = nucleotides(b"GTA");
        let mut matrix = AffineAlignmentMatrix::new(
            Score::new(-10),
            Score::new(-1),
            true,
            false,
            2,
            3,
            Score::new(-4),
        );
        matrix.align(&first, &second, &simple_matrix());

        let negative_infinity = matrix.negative_infinity();
        assert_eq!(negative_infinity.as_i32(), i32::MIN + 26);
        assert_eq!(matrix.scores(State::Match)[[0, 0]], Score::zero());
        assert_eq!(matrix.scores(State::Match)[[0, 2]], negative_infinity);
        assert_eq!(matrix.scores(State::Gap1)[[0, 1]], Score::new(-10));
        assert_eq!(matrix.scores(State::Gap1)[[0, 3]], Score::new(-12));
        assert_eq!(matrix.scores(State::Gap2)[[2, 0]], Score::new(-11));
        assert_eq!(matrix.scores(State::Gap2)[[0, 2]], negative_infinity);
        assert_eq!(
            matrix.traces()[[0, 1]].gap1_sources,
            [GapTransition::Open].into()
        );
        assert_eq!(
            matrix.traces()[[0, 3]].gap1_sources,
            [GapTransition::Extend].into()
        );
        assert_eq!(matrix.traces()[[0, 0]], AffineTraceEntry::default());
    }

    #[test]
    fn free_terminal_gaps() {
        let first = nucleotides(b"AC");
        let second = nucleotides(b"GTAC");
        let mut matrix = AffineAlignmentMatrix::new(
            Score::new(-10),
            Score::new(-1),
            false,
            false,
            2,
            4,
            Score::new(-4),
        );
        assert_eq!(matrix.align(&first, &second, &simple_matrix()), Score::new(12));
        assert_eq!(matrix.scores(State::Gap1)[[0, 2]], Score::zero());
        assert_eq!(matrix.scores(State::Match)[[2, 4]], Score::new(12));
    }

    #[test]
    fn match_sources() {
        let first = nucleotides(b"AAT");
        let second = nucleotides(b"AT");
        let mut matrix = AffineAlignmentMatrix::new(
            Score::new(-5),
            Score::new(-1),
            true,
            false,
            3,
            2,
            Score::new(-4),
        );
        // AAT/-AT and AAT/A-T
        assert_eq!(matrix.align(&first, &second, &simple_matrix()), Score::new(7));
        assert_eq!(
            matrix.traces()[[3, 2]].match_sources,
            [State::Match, State::Gap2].into()
        );
        assert_eq!(
            matrix.traces()[[3, 2]].sources(State::Match).collect::<Vec<_>>(),
            vec![State::Match, State::Gap2]
        );
    }

    #[test]
    fn gap_sources_never_cross() {
        let first = nucleotides(b"ACGTTGCA");
        let second = nucleotides(b"AGGTCA");
        let mut matrix = AffineAlignmentMatrix::new(
            Score::new(-3),
            Score::new(-3),
            true,
            false,
            8,
            6,
            Score::new(-4),
        );
        matrix.align(&first, &second, &simple_matrix());

        for entry in matrix.traces() {
            assert!(!entry.sources(State::Gap1).any(|state| state == State::Gap2));
            assert!(!entry.sources(State::Gap2).any(|state| state == State::Gap1));
        }
    }

    #[test]
    fn equal_open_and_extend_match_general_penalty() {
        // With terminal penalties, two adjacent gaps in different sequences never beat a mismatch.
        for (first, second) in [
            (b"ATACGCTTGCT".as_slice(), b"AGGCGCAGCT".as_slice()),
            (b"GATTACA", b"GCATGCT"),
            (b"A", b"TTTT"),
        ] {
            let first = nucleotides(first);
            let second = nucleotides(second);
            for local in [true, false] {
                let mut general =
                    AlignmentMatrix::new(Score::new(-6), true, local, first.len(), second.len());
                let general_score = general.align(&first, &second, &simple_matrix());
                let mut affine = AffineAlignmentMatrix::new(
                    Score::new(-6),
                    Score::new(-6),
                    true,
                    local,
                    first.len(),
                    second.len(),
                    Score::new(-4),
                );
                let affine_score = affine.align(&first, &second, &simple_matrix());

                if local {
                    let general_best = general.scores().iter().max().copied();
                    let affine_best = State::ALL
                        .into_iter()
                        .filter_map(|state| affine.scores(state).iter().max().copied())
                        .max();
                    assert_eq!(general_best, affine_best, "{first} {second}");
                } else {
                    assert_eq!(general_score, affine_score, "{first} {second}");
                }
            }
        }
    }

    #[test]
    fn local_clamps_every_state() {
        let first = nucleotides(b"AAAA");
        let second = nucleotides(b"TTT");
        let mut matrix = AffineAlignmentMatrix::new(
            Score::new(-10),
            Score::new(-1),
            true,
            true,
            4,
            3,
            Score::new(-4),
        );
        matrix.align(&first, &second, &simple_matrix());

        for state in State::ALL {
            assert!(matrix.scores(state).iter().all(|&score| score <= Score::zero()));
        }
        assert!(matrix.traces().iter().all(|entry| {
            entry.match_sources.is_empty()
                && entry.gap1_sources.is_empty()
                && entry.gap2_sources == TransitionSet::new()
        }));
    }
}
