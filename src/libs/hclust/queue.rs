use super::store::pair_key;
use crate::libs::cost::Objective;
use crate::libs::phylo::NodeId;
use indexmap::IndexSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pair of nodes proposed for merging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Canonical pair, smaller id first
    pub pair: (NodeId, NodeId),
    pub score: f64,
}

/// Heap entry. Greater means better: higher priority, then the smaller pair.
#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: f64,
    candidate: Candidate,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .partial_cmp(&other.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.candidate.pair.cmp(&self.candidate.pair))
    }
}

/// Merge candidates, best first.
///
/// Entries are never removed when their nodes are merged away; such stale entries
/// are dropped when they reach the head of the heap.
#[derive(Debug, Clone)]
pub struct CandidateQueue {
    heap: BinaryHeap<Entry>,
    objective: Objective,
    /// Stale entries discarded so far
    discarded: usize,
}

impl CandidateQueue {
    pub fn new(objective: Objective) -> Self {
        Self {
            heap: BinaryHeap::new(),
            objective,
            discarded: 0,
        }
    }

    pub fn push(&mut self, i: NodeId, j: NodeId, score: f64) {
        // BinaryHeap is a max-heap
        let priority = match self.objective {
            Objective::Minimize => -score,
            Objective::Maximize => score,
        };
        self.heap.push(Entry {
            priority,
            candidate: Candidate {
                pair: pair_key(i, j),
                score,
            },
        });
    }

    /// Pop the best candidate whose nodes are both in `active`.
    ///
    /// Stale heads are discarded on the way. Ties go to the smaller pair.
    ///
    /// ```
    /// use clustree::libs::cost::Objective;
    /// use clustree::libs::hclust::CandidateQueue;
    /// use indexmap::IndexSet;
    ///
    /// let mut queue = CandidateQueue::new(Objective::Minimize);
    /// queue.push(1, 2, 0.5);
    /// queue.push(3, 2, 1.0);
    /// queue.push(4, 1, 1.0);
    ///
    /// let active: IndexSet<usize> = [2, 3, 4].into_iter().collect();
    /// let best = queue.pop_best_live(&active).unwrap();
    /// assert_eq!(best.pair, (2, 3));
    /// assert_eq!(queue.discarded(), 2);
    /// assert!(queue.pop_best_live(&active).is_none());
    /// ```
    pub fn pop_best_live(&mut self, active: &IndexSet<NodeId>) -> Option<Candidate> {
        while let Some(entry) = self.heap.pop() {
            let (i, j) = entry.candidate.pair;
            if active.contains(&i) && active.contains(&j) {
                return Some(entry.candidate);
            }
            self.discarded += 1;
        }
        None
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Number of queued entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }
}
