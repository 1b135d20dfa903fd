use crate::libs::phylo::NodeId;
use thiserror::Error;

/// Failures of alignment and clustering. None of them is recoverable within a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// The cost model has no entry for a pair of symbols met during alignment.
    #[error("no cost defined for symbol pair ('{}', '{}')", symbol(.first), symbol(.second))]
    Configuration { first: u8, second: u8 },

    /// Empty, missing or duplicated input sequences.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A pair score was read before it was stored. Indicates broken merge bookkeeping.
    #[error("no score stored for node pair ({left}, {right})")]
    MissingScore { left: NodeId, right: NodeId },
}

fn symbol(byte: &u8) -> char {
    char::from(*byte)
}
