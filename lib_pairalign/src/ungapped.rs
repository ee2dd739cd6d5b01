use log::debug;

use crate::{
    alignment::Alignment,
    error::{Error, Result},
    score::Score,
    sequence::CodedSequence,
    substitution_matrix::SubstitutionMatrix,
};

/// Aligns two sequences of equal length position by position.
///
/// The trace of the resulting alignment pairs position `i` of the first sequence
/// with position `i` of the second.
pub fn align_ungapped(
    sequence1: &CodedSequence,
    sequence2: &CodedSequence,
    substitution_matrix: &SubstitutionMatrix,
) -> Result<Alignment> {
    let score = score_ungapped(sequence1, sequence2, substitution_matrix)?;
    let trace = (0..sequence1.len())
        .map(|index| (Some(index), Some(index)))
        .collect();

    Ok(Alignment::new(
        sequence1.clone(),
        sequence2.clone(),
        trace,
        score,
    ))
}

/// The sum of the substitution scores of all positions of two sequences of equal length.
pub fn score_ungapped(
    sequence1: &CodedSequence,
    sequence2: &CodedSequence,
    substitution_matrix: &SubstitutionMatrix,
) -> Result<Score> {
    if sequence1.len() != sequence2.len() {
        return Err(Error::LengthMismatch {
            first: sequence1.len(),
            second: sequence2.len(),
        });
    }
    substitution_matrix.check_alphabets(sequence1, sequence2)?;
    Score::check_range(sequence1.len(), substitution_matrix.max_magnitude(), 0)?;
    debug!(
        "Scoring ungapped alignment of length {} with substitution matrix '{}'",
        sequence1.len(),
        substitution_matrix.name()
    );

    Ok(sequence1
        .codes()
        .iter()
        .zip(sequence2.codes())
        .map(|(&code1, &code2)| substitution_matrix.score(code1, code2))
        .sum())
}
