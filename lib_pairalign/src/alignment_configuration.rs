use crate::gap_penalty::GapPenalty;

/// Options for optimal alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentConfiguration {
    pub gap_penalty: GapPenalty,

    /// If false, gaps at the start and end of either sequence are free.
    pub terminal_penalty: bool,

    /// Compute a local (Smith-Waterman) instead of a global (Needleman-Wunsch) alignment.
    pub local: bool,

    /// The maximum amount of co-optimal alignments to report.
    pub max_number: usize,
}

impl AlignmentConfiguration {
    pub fn new(gap_penalty: GapPenalty) -> Self {
        Self {
            gap_penalty,
            ..Default::default()
        }
    }

    pub fn with_terminal_penalty(mut self, terminal_penalty: bool) -> Self {
        self.terminal_penalty = terminal_penalty;
        self
    }

    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn with_max_number(mut self, max_number: usize) -> Self {
        self.max_number = max_number;
        self
    }
}

impl Default for AlignmentConfiguration {
    fn default() -> Self {
        Self {
            gap_penalty: GapPenalty::default(),
            terminal_penalty: true,
            local: false,
            max_number: 1000,
        }
    }
}
