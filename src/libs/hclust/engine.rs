use super::queue::CandidateQueue;
use super::store::PairScoreStore;
use crate::libs::align::Aligner;
use crate::libs::cost::CostModel;
use crate::libs::error::ClusterError;
use crate::libs::phylo::{Dendrogram, NodeId};
use crate::libs::seq::{SeqSet, Sequence};
use indexmap::IndexSet;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info};

/// Where the engine is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// All pairwise scores of the sequences are stored and queued
    Seeded,
    /// At least one merge has been committed
    Clustering,
    /// The active set has reached its stopping size
    Done,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterOptions {
    /// Merge the last two clusters into a single root
    pub join_roots: bool,
    /// Align the seeding pairs on the rayon thread pool
    pub parallel: bool,
}

impl ClusterOptions {
    fn stop_size(&self) -> usize {
        if self.join_roots {
            1
        } else {
            2
        }
    }
}

/// A committed merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub id: NodeId,
    pub left: NodeId,
    pub right: NodeId,
    pub score: f64,
}

/// Agglomerative clustering with average linkage.
///
/// ```
/// use clustree::libs::cost::CostModel;
/// use clustree::libs::hclust::{ClusterEngine, ClusterOptions};
/// use clustree::libs::seq::SeqSet;
///
/// let mut seqs = SeqSet::new();
/// for s in ["AAAA", "AAAT", "TTTT"] {
///     seqs.push("", s);
/// }
/// let cost = CostModel::unit(b"AT");
/// let tree = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default())
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(tree.roots(), &[3, 4]);
/// assert_eq!(tree.render(4).unwrap(), "(1,2)");
/// ```
#[derive(Debug)]
pub struct ClusterEngine {
    store: PairScoreStore,
    queue: CandidateQueue,
    active: IndexSet<NodeId>,
    tree: Dendrogram,
    next_id: NodeId,
    state: State,
    stop_size: usize,
}

impl ClusterEngine {
    /// Align every unordered pair of sequences, store and queue the scores, and
    /// record each sequence as an active leaf.
    ///
    /// A pair `i < j` is scored as `align(seq[i], seq[j])`.
    pub fn seed(
        seqs: &SeqSet,
        cost: &CostModel,
        options: ClusterOptions,
    ) -> Result<Self, ClusterError> {
        if seqs.is_empty() {
            return Err(ClusterError::InvalidInput(
                "no sequences to cluster".to_string(),
            ));
        }
        if let Some(seq) = seqs.iter().find(|s| s.symbols.is_empty()) {
            return Err(ClusterError::InvalidInput(format!(
                "sequence {} is empty",
                seq.id
            )));
        }
        cost.validate()?;

        let list: Vec<&Sequence> = seqs.iter().collect();
        let pairs: Vec<(usize, usize)> = (0..list.len()).tuple_combinations().collect();

        let aligner = Aligner::new(cost);
        let align_pair = |&(x, y): &(usize, usize)| aligner.score(&list[x].symbols, &list[y].symbols);
        let scores: Vec<f64> = if options.parallel {
            pairs.par_iter().map(align_pair).collect::<Result<_, _>>()?
        } else {
            pairs.iter().map(align_pair).collect::<Result<_, _>>()?
        };

        let mut store = PairScoreStore::with_capacity(pairs.len());
        let mut queue = CandidateQueue::new(cost.objective());
        let mut tree = Dendrogram::new();
        let mut active = IndexSet::with_capacity(list.len());

        for seq in &list {
            tree.add_leaf(seq.id)?;
            active.insert(seq.id);
        }
        for (&(x, y), score) in pairs.iter().zip(scores) {
            let (i, j) = (list[x].id, list[y].id);
            store.put(i, j, score);
            queue.push(i, j, score);
        }

        info!(
            "Seeded {} sequences with {} pairwise alignments",
            list.len(),
            pairs.len()
        );

        Ok(Self {
            store,
            queue,
            active,
            tree,
            next_id: seqs.max_id().unwrap_or(0) + 1,
            state: State::Seeded,
            stop_size: options.stop_size(),
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Ids of the active nodes, in insertion order
    pub fn active(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.active.iter().copied()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn store(&self) -> &PairScoreStore {
        &self.store
    }

    pub fn tree(&self) -> &Dendrogram {
        &self.tree
    }

    /// Merge the best live pair. Returns `None`, and switches to [`State::Done`], once
    /// the active set has reached its stopping size.
    pub fn step(&mut self) -> Result<Option<Merge>, ClusterError> {
        if self.state == State::Done {
            return Ok(None);
        }
        if self.active.len() <= self.stop_size {
            let mut roots: Vec<NodeId> = self.active.iter().copied().collect();
            roots.sort_unstable();
            self.tree.set_roots(roots);
            self.state = State::Done;
            return Ok(None);
        }

        let Some(best) = self.queue.pop_best_live(&self.active) else {
            // every pair of active nodes is queued, so this is a bookkeeping bug
            let mut ids = self.active.iter().copied();
            return Err(ClusterError::MissingScore {
                left: ids.next().unwrap_or_default(),
                right: ids.next().unwrap_or_default(),
            });
        };
        let (left, right) = best.pair;
        let id = self.next_id;

        // average linkage against every other active node
        let mut linkage = Vec::with_capacity(self.active.len() - 2);
        for &other in &self.active {
            if other == left || other == right {
                continue;
            }
            let score = 0.5 * (self.store.get(left, other)? + self.store.get(right, other)?);
            linkage.push((other, score));
        }

        self.tree.add_merge(id, left, right, best.score)?;
        self.next_id += 1;
        for (other, score) in linkage {
            self.store.put(id, other, score);
            self.queue.push(id, other, score);
        }
        self.active.shift_remove(&left);
        self.active.shift_remove(&right);
        self.active.insert(id);
        self.state = State::Clustering;

        debug!(
            "Merged {} and {} into {} at {} ({} active)",
            left,
            right,
            id,
            best.score,
            self.active.len()
        );

        Ok(Some(Merge {
            id,
            left,
            right,
            score: best.score,
        }))
    }

    /// Merge until done and hand over the dendrogram.
    pub fn run(mut self) -> Result<Dendrogram, ClusterError> {
        let mut merges = 0;
        while self.step()?.is_some() {
            merges += 1;
        }

        info!(
            "Clustering done after {} merges; {} stale candidates skipped",
            merges,
            self.queue.discarded()
        );

        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::cost::Objective;
    use approx::assert_relative_eq;

    fn seq_set(seqs: &[&str]) -> SeqSet {
        let mut set = SeqSet::new();
        for (i, s) in seqs.iter().enumerate() {
            set.push(format!("S{}", i + 1), *s);
        }
        set
    }

    fn merges(tree: &Dendrogram) -> Vec<(NodeId, NodeId, NodeId)> {
        tree.merges()
            .filter_map(|n| n.children.map(|(l, r)| (n.id, l, r)))
            .collect()
    }

    const FOUR: [&str; 4] = ["AAAAAAAA", "AAAAAAAT", "CCCCGGGG", "CCCCGGGT"];

    #[test]
    fn test_engine_identical_sequences_tie_break() {
        let seqs = seq_set(&["AAA", "AAA", "AAA"]);
        let cost = CostModel::unit(b"A");

        let first = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(merges(&first), vec![(4, 1, 2)]);
        assert_eq!(first.roots(), &[3, 4]);

        for _ in 0..5 {
            let again = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default())
                .unwrap()
                .run()
                .unwrap();
            assert_eq!(merges(&again), merges(&first));
            assert_eq!(again.roots(), first.roots());
        }
    }

    #[test]
    fn test_engine_two_tight_pairs() {
        let seqs = seq_set(&FOUR);
        let cost = CostModel::unit(b"ACGT");

        let tree = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(merges(&tree), vec![(5, 1, 2), (6, 3, 4)]);
        assert_eq!(tree.roots(), &[5, 6]);
        assert_eq!(tree.to_newick().unwrap(), "(1,2);\n(3,4);\n");
    }

    #[test]
    fn test_engine_join_roots() {
        let seqs = seq_set(&FOUR);
        let cost = CostModel::unit(b"ACGT");
        let options = ClusterOptions {
            join_roots: true,
            ..Default::default()
        };

        let tree = ClusterEngine::seed(&seqs, &cost, options)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(tree.roots(), &[7]);
        assert_eq!(tree.render(7).unwrap(), "((1,2),(3,4))");
        assert_eq!(tree.get(7).unwrap().size, 4);
    }

    #[test]
    fn test_engine_average_linkage() {
        // d(1,2) = 1, d(1,3) = 4, d(2,3) = 3
        let seqs = seq_set(&["AAAA", "AAAT", "TTTT"]);
        let cost = CostModel::unit(b"AT");

        let mut engine = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default()).unwrap();
        assert_eq!(engine.state(), State::Seeded);

        let merge = engine.step().unwrap().unwrap();
        assert_eq!(merge, Merge { id: 4, left: 1, right: 2, score: 1.0 });
        assert_eq!(engine.state(), State::Clustering);
        assert_relative_eq!(engine.store().get(4, 3).unwrap(), 3.5);
        assert_relative_eq!(engine.store().get(3, 4).unwrap(), 3.5);

        assert_eq!(engine.step().unwrap(), None);
        assert_eq!(engine.state(), State::Done);
        assert_eq!(engine.step().unwrap(), None);
    }

    #[test]
    fn test_engine_invariants() {
        let seqs = seq_set(&[
            "ACGTACGTAC",
            "ACGTACGTAA",
            "TTGTACCTAC",
            "ACCTACGGAC",
            "GGGTACGTTT",
            "ACGTTCGTAC",
            "TCGTACGAAC",
        ]);
        let cost = CostModel::unit(b"ACGT");
        let mut engine = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default()).unwrap();

        let mut last_id = seqs.max_id().unwrap();
        loop {
            let before: Vec<NodeId> = engine.active().collect();
            let Some(merge) = engine.step().unwrap() else {
                break;
            };

            // no stale merge
            assert!(before.contains(&merge.left));
            assert!(before.contains(&merge.right));
            // monotonic ids
            assert!(merge.id > last_id);
            last_id = merge.id;
            // two out, one in
            assert_eq!(engine.active_len(), before.len() - 1);
            // children exist before their parent
            assert!(merge.left < merge.id && merge.right < merge.id);

            // symmetric scores against every active node
            for other in engine.active().filter(|&o| o != merge.id) {
                assert_eq!(
                    engine.store().get(merge.id, other).unwrap(),
                    engine.store().get(other, merge.id).unwrap()
                );
            }
        }
        assert_eq!(engine.active_len(), 2);

        let tree = engine.tree();
        assert_eq!(tree.leaves().collect::<Vec<_>>(), seqs.ids().collect::<Vec<_>>());
        assert_eq!(tree.merges().count(), seqs.len() - 2);
        assert_eq!(tree.orphans(), tree.roots().to_vec());
        let size: usize = tree.roots().iter().map(|&r| tree.get(r).unwrap().size).sum();
        assert_eq!(size, seqs.len());
    }

    #[test]
    fn test_engine_parallel_matches_sequential() {
        let seqs = seq_set(&[
            "ACGTACGTAC",
            "ACGTACGTAA",
            "TTGTACCTAC",
            "ACCTACGGAC",
            "GGGTACGTTT",
            "ACGTTCGTAC",
        ]);
        let cost = CostModel::unit(b"ACGT");

        let sequential = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default()).unwrap();
        let parallel = ClusterEngine::seed(
            &seqs,
            &cost,
            ClusterOptions {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();

        for (i, j) in seqs.ids().tuple_combinations() {
            assert_eq!(
                sequential.store().get(i, j).unwrap(),
                parallel.store().get(i, j).unwrap()
            );
        }
        assert_eq!(
            merges(&sequential.run().unwrap()),
            merges(&parallel.run().unwrap())
        );
    }

    #[test]
    fn test_engine_maximize() {
        // similarities: s(1,2) = 3, s(1,3) = 0, s(2,3) = 1
        let mut cost = CostModel::new(b"AT").with_objective(Objective::Maximize);
        for a in [b'A', b'T'] {
            for b in [b'A', b'T'] {
                cost.set(a, b, if a == b { 1.0 } else { 0.0 });
            }
        }
        cost.set_gap(0.0);

        let seqs = seq_set(&["AAAA", "AAAT", "TTTT"]);
        let mut engine = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default()).unwrap();
        assert_eq!(engine.store().get(1, 3).unwrap(), 0.0);

        let merge = engine.step().unwrap().unwrap();
        assert_eq!((merge.left, merge.right), (1, 2));
        assert_eq!(merge.score, 3.0);
        // (1 + 0) / 2
        assert_relative_eq!(engine.store().get(3, 4).unwrap(), 0.5);
    }

    #[test]
    fn test_engine_sparse_ids() {
        let mut seqs = SeqSet::new();
        seqs.insert(10, "a", "AAAA").unwrap();
        seqs.insert(3, "b", "AAAT").unwrap();
        seqs.insert(42, "c", "TTTT").unwrap();
        let cost = CostModel::unit(b"AT");

        let tree = ClusterEngine::seed(&seqs, &cost, ClusterOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(merges(&tree), vec![(43, 3, 10)]);
        assert_eq!(tree.roots(), &[42, 43]);
    }

    #[test]
    fn test_engine_small_inputs() {
        let cost = CostModel::unit(b"ACGT");

        assert!(matches!(
            ClusterEngine::seed(&SeqSet::new(), &cost, ClusterOptions::default()),
            Err(ClusterError::InvalidInput(_))
        ));

        let one = seq_set(&["ACGT"]);
        let tree = ClusterEngine::seed(&one, &cost, ClusterOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(tree.roots(), &[1]);
        assert_eq!(tree.merges().count(), 0);

        let two = seq_set(&["ACGT", "ACGA"]);
        let tree = ClusterEngine::seed(&two, &cost, ClusterOptions::default())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(tree.roots(), &[1, 2]);

        let options = ClusterOptions {
            join_roots: true,
            ..Default::default()
        };
        let tree = ClusterEngine::seed(&two, &cost, options)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(tree.roots(), &[3]);
        assert_eq!(tree.get(3).unwrap().score, Some(1.0));
    }

    #[test]
    fn test_engine_rejects_bad_input() {
        let cost = CostModel::unit(b"ACGT");

        let unknown = seq_set(&["ACGT", "ACNT", "ACGA"]);
        assert!(matches!(
            ClusterEngine::seed(&unknown, &cost, ClusterOptions::default()),
            Err(ClusterError::Configuration { .. })
        ));

        let empty = seq_set(&["ACGT", "", "ACGA"]);
        assert_eq!(
            ClusterEngine::seed(&empty, &cost, ClusterOptions::default()).unwrap_err(),
            ClusterError::InvalidInput("sequence 2 is empty".to_string())
        );

        let mut partial = CostModel::new(b"ACGT");
        partial.set(b'A', b'A', 0.0);
        assert!(matches!(
            ClusterEngine::seed(&seq_set(&["A", "A"]), &partial, ClusterOptions::default()),
            Err(ClusterError::Configuration { .. })
        ));
    }
}
