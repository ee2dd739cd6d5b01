use std::ops::{Index, IndexMut};

use ndarray::Array2;

use super::Direction;
use crate::alignment::TraceEntry;

/// A cell of an alignment matrix.
///
/// `first` indexes rows (prefixes of the first sequence), `second` indexes columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlignmentMatrixIndex {
    pub(in crate::alignment_matrix) first: usize,
    pub(in crate::alignment_matrix) second: usize,
}

impl AlignmentMatrixIndex {
    pub fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    /// The cells of column `second` in a table with `rows` rows, from top to bottom.
    pub fn column_cells(second: usize, rows: usize) -> impl Iterator<Item = Self> {
        (0..rows).map(move |first| Self::new(first, second))
    }

    /// The cells of row `first` in a table with `columns` columns, from left to right.
    pub fn row_cells(first: usize, columns: usize) -> impl Iterator<Item = Self> {
        (0..columns).map(move |second| Self::new(first, second))
    }

    /// The cells outside of row and column zero of a table with the given shape, row by row.
    pub fn inner_cells((rows, columns): (usize, usize)) -> impl Iterator<Item = Self> {
        (1..rows).flat_map(move |first| (1..columns).map(move |second| Self::new(first, second)))
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn second(&self) -> usize {
        self.second
    }

    pub fn left_predecessor(&self) -> Self {
        debug_assert!(self.second > 0);

        Self {
            first: self.first,
            second: self.second - 1,
        }
    }

    pub fn top_predecessor(&self) -> Self {
        debug_assert!(self.first > 0);

        Self {
            first: self.first - 1,
            second: self.second,
        }
    }

    pub fn diagonal_predecessor(&self) -> Self {
        debug_assert!(self.first > 0);
        debug_assert!(self.second > 0);

        Self {
            first: self.first - 1,
            second: self.second - 1,
        }
    }

    pub fn predecessor(&self, direction: Direction) -> Self {
        match direction {
            Direction::Diagonal => self.diagonal_predecessor(),
            Direction::Left => self.left_predecessor(),
            Direction::Top => self.top_predecessor(),
        }
    }

    /// Steps back from this cell in the given direction.
    ///
    /// Returns the predecessor and the alignment column consumed by the step.
    pub fn trace_step(&self, direction: Direction) -> (Self, TraceEntry) {
        let predecessor = self.predecessor(direction);
        let entry = match direction {
            Direction::Diagonal => (Some(predecessor.first), Some(predecessor.second)),
            Direction::Left => (None, Some(predecessor.second)),
            Direction::Top => (Some(predecessor.first), None),
        };
        (predecessor, entry)
    }
}

impl<T> Index<AlignmentMatrixIndex> for Array2<T> {
    type Output = <Array2<T> as Index<[usize; 2]>>::Output;

    fn index(&self, index: AlignmentMatrixIndex) -> &Self::Output {
        &self[[index.first, index.second]]
    }
}

impl<T> IndexMut<AlignmentMatrixIndex> for Array2<T> {
    fn index_mut(&mut self, index: AlignmentMatrixIndex) -> &mut Self::Output {
        &mut self[[index.first, index.second]]
    }
}
