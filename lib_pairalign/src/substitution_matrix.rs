use ndarray::Array2;
use num_traits::Zero;

use crate::{
    alphabet::Alphabet,
    error::{Error, Result},
    score::Score,
    sequence::CodedSequence,
};

/// A table of similarity scores between the symbols of two alphabets.
///
/// Rows are indexed by codes of the first alphabet, columns by codes of the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    name: String,
    alphabet1: Alphabet,
    alphabet2: Alphabet,
    score_table: Array2<i32>,

    // Cache some values that are used for sentinel sizing.
    min_score: Score,
    max_score: Score,
}

impl SubstitutionMatrix {
    pub fn new(
        name: impl Into<String>,
        alphabet1: Alphabet,
        alphabet2: Alphabet,
        score_table: Array2<i32>,
    ) -> Result<Self> {
        let expected = (alphabet1.len(), alphabet2.len());
        if score_table.dim() != expected {
            return Err(Error::MatrixShapeMismatch {
                expected,
                actual: score_table.dim(),
            });
        }

        let min_score = score_table.iter().min().copied().unwrap_or(0).into();
        let max_score = score_table.iter().max().copied().unwrap_or(0).into();

        Ok(Self {
            name: name.into(),
            alphabet1,
            alphabet2,
            score_table,
            min_score,
            max_score,
        })
    }

    /// A matrix over a single alphabet that only distinguishes matches from mismatches.
    pub fn new_base_agnostic(
        name: impl Into<String>,
        alphabet: Alphabet,
        match_score: i32,
        mismatch_score: i32,
    ) -> Self {
        let size = alphabet.len();
        let score_table = Array2::from_shape_fn((size, size), |(a, b)| {
            if a == b { match_score } else { mismatch_score }
        });
        let (min_score, max_score) = if size == 0 {
            (Score::zero(), Score::zero())
        } else if size == 1 {
            (match_score.into(), match_score.into())
        } else {
            (
                match_score.min(mismatch_score).into(),
                match_score.max(mismatch_score).into(),
            )
        };

        Self {
            name: name.into(),
            alphabet1: alphabet.clone(),
            alphabet2: alphabet,
            score_table,
            min_score,
            max_score,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet1(&self) -> &Alphabet {
        &self.alphabet1
    }

    pub fn alphabet2(&self) -> &Alphabet {
        &self.alphabet2
    }

    pub fn score_table(&self) -> &Array2<i32> {
        &self.score_table
    }

    pub fn score(&self, code1: u8, code2: u8) -> Score {
        self.score_table[[usize::from(code1), usize::from(code2)]].into()
    }

    pub fn min_score(&self) -> Score {
        self.min_score
    }

    pub fn max_score(&self) -> Score {
        self.max_score
    }

    /// The largest magnitude of any score in this matrix.
    pub fn max_magnitude(&self) -> i64 {
        i64::from(self.min_score.as_i32())
            .abs()
            .max(i64::from(self.max_score.as_i32()).abs())
    }

    /// The same matrix with its axes swapped.
    pub fn transpose(&self) -> Self {
        Self {
            name: self.name.clone(),
            alphabet1: self.alphabet2.clone(),
            alphabet2: self.alphabet1.clone(),
            score_table: self.score_table.t().to_owned(),
            min_score: self.min_score,
            max_score: self.max_score,
        }
    }

    /// Fails with [`Error::AlphabetMismatch`] if this matrix cannot score the given sequence pair.
    pub fn check_alphabets(
        &self,
        sequence1: &CodedSequence,
        sequence2: &CodedSequence,
    ) -> Result<()> {
        for (sequence, matrix_alphabet, sequence_alphabet) in [
            (1, &self.alphabet1, sequence1.alphabet()),
            (2, &self.alphabet2, sequence2.alphabet()),
        ] {
            if !matrix_alphabet.extends(sequence_alphabet) {
                return Err(Error::AlphabetMismatch {
                    sequence,
                    expected: matrix_alphabet.to_string(),
                    actual: sequence_alphabet.to_string(),
                });
            }
        }

        Ok(())
    }
}
