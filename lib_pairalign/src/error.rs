use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(
        "Ungapped alignment requires sequences of equal length, but the first sequence has length {first} and the second has length {second}."
    )]
    LengthMismatch { first: usize, second: usize },

    #[error(
        "The substitution matrix alphabet '{expected}' does not extend the alphabet '{actual}' of sequence {sequence}."
    )]
    AlphabetMismatch {
        sequence: usize,
        expected: String,
        actual: String,
    },

    #[error("Invalid gap penalty: {reason}.")]
    InvalidGapPenalty { reason: String },

    #[error("The symbol '{symbol}' occurs more than once in the alphabet.")]
    DuplicateSymbol { symbol: char },

    #[error(
        "The symbol '{symbol}' at position {position} is not part of the alphabet '{alphabet}'."
    )]
    UnknownSymbol {
        symbol: char,
        position: usize,
        alphabet: String,
    },

    #[error(
        "The code {code} at position {position} is out of range for an alphabet of size {size}."
    )]
    CodeOutOfRange {
        code: u8,
        position: usize,
        size: usize,
    },

    #[error(
        "Alignments of up to {columns} columns scoring up to {column_magnitude} in magnitude with a sentinel headroom of {headroom} exceed the score limit of {limit}."
    )]
    ScoreOutOfRange {
        columns: usize,
        column_magnitude: i64,
        headroom: i64,
        limit: i64,
    },

    #[error("Invalid trace column {column}: {reason}.")]
    InvalidTrace { column: usize, reason: String },

    #[error(
        "The substitution matrix has shape {actual:?}, but its alphabets require shape {expected:?}."
    )]
    MatrixShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}
