//! Agglomerative clustering of sequences by alignment score.
//!
//! * [`store`] - Symmetric pair scores.
//! * [`queue`] - Merge candidates with lazy invalidation.
//! * [`engine`] - The merge loop, with average linkage.

pub mod engine;
pub mod queue;
pub mod store;

pub use engine::{ClusterEngine, ClusterOptions, Merge, State};
pub use queue::{Candidate, CandidateQueue};
pub use store::{pair_key, PairScoreStore};

use crate::libs::cost::CostModel;
use crate::libs::error::ClusterError;
use crate::libs::phylo::Dendrogram;
use crate::libs::seq::SeqSet;

/// Seed and run the engine in one go.
pub fn cluster(
    seqs: &SeqSet,
    cost: &CostModel,
    options: ClusterOptions,
) -> Result<Dendrogram, ClusterError> {
    ClusterEngine::seed(seqs, cost, options)?.run()
}
