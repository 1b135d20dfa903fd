use crate::libs::error::ClusterError;
use crate::libs::phylo::NodeId;
use fxhash::FxHashMap;

/// Canonical key of an unordered pair: smaller id first.
///
/// ```
/// use clustree::libs::hclust::pair_key;
/// assert_eq!(pair_key(7, 3), (3, 7));
/// assert_eq!(pair_key(3, 7), (3, 7));
/// ```
pub fn pair_key(i: NodeId, j: NodeId) -> (NodeId, NodeId) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

/// Symmetric scores of node pairs.
///
/// One physical entry per unordered pair, so `score(i, j)` and `score(j, i)` cannot
/// diverge. Entries of merged-away nodes are never removed, only never read again.
#[derive(Debug, Default, Clone)]
pub struct PairScoreStore {
    scores: FxHashMap<(NodeId, NodeId), f64>,
}

impl PairScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scores: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Score of the pair, in either order.
    pub fn get(&self, i: NodeId, j: NodeId) -> Result<f64, ClusterError> {
        let (left, right) = pair_key(i, j);
        self.scores
            .get(&(left, right))
            .copied()
            .ok_or(ClusterError::MissingScore { left, right })
    }

    /// Store the score of the pair, replacing any previous one.
    pub fn put(&mut self, i: NodeId, j: NodeId, score: f64) {
        self.scores.insert(pair_key(i, j), score);
    }

    pub fn contains(&self, i: NodeId, j: NodeId) -> bool {
        self.scores.contains_key(&pair_key(i, j))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
