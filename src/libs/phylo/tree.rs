use super::node::{Node, NodeId};
use super::writer;
use crate::libs::error::ClusterError;
use std::collections::BTreeMap;

/// Append-only binary merge record.
///
/// Leaves are added first; every virtual node joins two existing parentless nodes
/// and must carry an id above all ids seen so far. Nodes are never removed.
#[derive(Debug, Default, Clone)]
pub struct Dendrogram {
    nodes: BTreeMap<NodeId, Node>,

    /// Top-level clusters, set when clustering is done
    roots: Vec<NodeId>,
}

impl Dendrogram {
    /// Create a new empty dendrogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a leaf.
    pub fn add_leaf(&mut self, id: NodeId) -> Result<(), ClusterError> {
        if self.nodes.contains_key(&id) {
            return Err(ClusterError::InvalidInput(format!(
                "node {} already exists",
                id
            )));
        }
        self.nodes.insert(id, Node::leaf(id));
        Ok(())
    }

    /// Record the merge of `left` and `right` into the new node `id`.
    ///
    /// ```
    /// use clustree::libs::phylo::Dendrogram;
    /// let mut tree = Dendrogram::new();
    /// tree.add_leaf(1).unwrap();
    /// tree.add_leaf(2).unwrap();
    /// tree.add_leaf(3).unwrap();
    /// tree.add_merge(4, 1, 2, 0.5).unwrap();
    ///
    /// // ids must grow, children must exist and be unmerged
    /// assert!(tree.add_merge(4, 3, 4, 1.0).is_err());
    /// assert!(tree.add_merge(5, 1, 3, 1.0).is_err());
    /// assert!(tree.add_merge(5, 3, 9, 1.0).is_err());
    ///
    /// tree.add_merge(5, 3, 4, 1.0).unwrap();
    /// assert_eq!(tree.get(5).unwrap().size, 3);
    /// ```
    pub fn add_merge(
        &mut self,
        id: NodeId,
        left: NodeId,
        right: NodeId,
        score: f64,
    ) -> Result<(), ClusterError> {
        if let Some(max) = self.max_id() {
            if id <= max {
                return Err(ClusterError::InvalidInput(format!(
                    "node id {} is not above {}",
                    id, max
                )));
            }
        }
        if left == right {
            return Err(ClusterError::InvalidInput(format!(
                "cannot merge node {} with itself",
                left
            )));
        }

        let mut size = 0;
        for child in [left, right] {
            let node = self.nodes.get(&child).ok_or_else(|| {
                ClusterError::InvalidInput(format!("child node {} not found", child))
            })?;
            if let Some(parent) = node.parent {
                return Err(ClusterError::InvalidInput(format!(
                    "node {} already merged into {}",
                    child, parent
                )));
            }
            size += node.size;
        }

        for child in [left, right] {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent = Some(id);
            }
        }
        self.nodes
            .insert(id, Node::merge(id, left, right, score, size));

        Ok(())
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The largest id allocated so far
    pub fn max_id(&self) -> Option<NodeId> {
        self.nodes.keys().next_back().copied()
    }

    /// Leaf ids in ascending order
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .values()
            .filter(|n| n.is_leaf())
            .map(|n| n.id)
    }

    /// Virtual nodes in creation order
    pub fn merges(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| !n.is_leaf())
    }

    /// Nodes without a parent, in ascending id order
    pub fn orphans(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect()
    }

    /// The top-level clusters left when clustering stopped
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    /// Parenthesized topology below `root`, leaves shown by id.
    pub fn render(&self, root: NodeId) -> Result<String, ClusterError> {
        writer::render(self, root)
    }

    /// Every root as a Newick string, one per line.
    pub fn to_newick(&self) -> Result<String, ClusterError> {
        writer::write_newick(self)
    }
}
