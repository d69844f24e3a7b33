use thiserror::Error;

/// Input that cannot be turned into a sequence, a structure or a pair space.
///
/// All of these are raised at construction time, before any state exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("sequence of length {length} admits no pairs with a minimum loop of {min_loop}")]
    SequenceTooShort { length: usize, min_loop: usize },

    #[error("sequence of length {0} exceeds the supported maximum of {max}", max = crate::NAIDX::MAX)]
    SequenceTooLong(usize),

    #[error("invalid nucleotide '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("invalid structure character '{symbol}' at position {position}")]
    InvalidStructureSymbol { symbol: char, position: usize },

    #[error("unbalanced bracket at position {0}")]
    UnbalancedBracket(usize),

    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}
