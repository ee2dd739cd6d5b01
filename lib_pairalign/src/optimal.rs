use log::debug;

use crate::{
    alignment::Alignment,
    alignment_configuration::AlignmentConfiguration,
    alignment_matrix::{AlignmentMatrix, affine::AffineAlignmentMatrix},
    error::Result,
    gap_penalty::GapPenalty,
    sequence::CodedSequence,
    substitution_matrix::SubstitutionMatrix,
    traceback::traceback,
};

/// Computes all co-optimal alignments of two sequences, up to `configuration.max_number`.
///
/// All returned alignments have the same score.
/// At least one alignment is returned.
/// It has an empty trace if a local alignment finds no positive score.
pub fn align_optimal(
    sequence1: &CodedSequence,
    sequence2: &CodedSequence,
    substitution_matrix: &SubstitutionMatrix,
    configuration: &AlignmentConfiguration,
) -> Result<Vec<Alignment>> {
    configuration.gap_penalty.check()?;
    substitution_matrix.check_alphabets(sequence1, sequence2)?;
    let sentinel_headroom = match configuration.gap_penalty {
        GapPenalty::General(_) => 0,
        GapPenalty::Affine { open, extend } => AffineAlignmentMatrix::sentinel_headroom(
            open,
            extend,
            substitution_matrix.min_score(),
        ),
    };
    configuration.gap_penalty.check_score_range(
        substitution_matrix,
        sequence1.len().saturating_add(sequence2.len()),
        sentinel_headroom,
    )?;
    debug!(
        "Aligning sequences of lengths {} and {} {}ly with {:?}, terminal penalty {} and substitution matrix '{}'",
        sequence1.len(),
        sequence2.len(),
        if configuration.local { "local" } else { "global" },
        configuration.gap_penalty,
        configuration.terminal_penalty,
        substitution_matrix.name(),
    );

    let (score, traces) = match configuration.gap_penalty {
        GapPenalty::General(gap_penalty) => {
            let mut matrix = AlignmentMatrix::new(
                gap_penalty,
                configuration.terminal_penalty,
                configuration.local,
                sequence1.len(),
                sequence2.len(),
            );
            matrix.align(sequence1, sequence2, substitution_matrix);
            traceback(&matrix, configuration.max_number)
        }
        GapPenalty::Affine { open, extend } => {
            let mut matrix = AffineAlignmentMatrix::new(
                open,
                extend,
                configuration.terminal_penalty,
                configuration.local,
                sequence1.len(),
                sequence2.len(),
                substitution_matrix.min_score(),
            );
            matrix.align(sequence1, sequence2, substitution_matrix);
            traceback(&matrix, configuration.max_number)
        }
    };

    Ok(traces
        .into_iter()
        .map(|trace| Alignment::new(sequence1.clone(), sequence2.clone(), trace, score))
        .collect())
}
