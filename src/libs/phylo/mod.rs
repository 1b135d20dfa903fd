//! The dendrogram produced by clustering.
//!
//! * [`node`] - Leaf and virtual nodes.
//! * [`tree`] - [`Dendrogram`], the append-only record of every merge.
//! * [`writer`] - Newick topology and merge tables.

pub mod node;
pub mod tree;
pub mod writer;


pub use node::{Node, NodeId};
pub use tree::Dendrogram;
