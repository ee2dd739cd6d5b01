pub mod alignment;
pub mod alignment_configuration;
pub mod alignment_matrix;
pub mod alphabet;
pub mod error;
pub mod gap_penalty;
pub mod optimal;
pub mod score;
pub mod sequence;
pub mod substitution_matrix;
pub mod traceback;
pub mod ungapped;


pub use alignment::{Alignment, IdentityMode, TraceEntry};
pub use alignment_configuration::AlignmentConfiguration;
pub use error::{Error, Result};
pub use gap_penalty::GapPenalty;
pub use optimal::align_optimal;
pub use score::Score;
pub use ungapped::{align_ungapped, score_ungapped};
