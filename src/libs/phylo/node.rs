/// NodeId identifies a node of the dendrogram.
/// Leaves reuse the ids of their sequences; virtual nodes are numbered above them.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier, also the node's creation order among virtual nodes
    pub id: NodeId,

    /// The virtual node this one was merged into (None while active, and for roots)
    pub parent: Option<NodeId>,

    /// `(left, right)` for a virtual node, None for a leaf
    pub children: Option<(NodeId, NodeId)>,

    // --- Payload ---

    /// Linkage score at which a virtual node was formed
    pub score: Option<f64>,

    /// Number of leaves in the subtree
    pub size: usize,
}

impl Node {
    /// Create a leaf node
    pub fn leaf(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            children: None,
            score: None,
            size: 1,
        }
    }

    /// Create a virtual node joining `left` and `right`
    pub fn merge(id: NodeId, left: NodeId, right: NodeId, score: f64, size: usize) -> Self {
        Self {
            id,
            parent: None,
            children: Some((left, right)),
            score: Some(score),
            size,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
