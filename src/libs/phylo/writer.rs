use super::node::NodeId;
use super::tree::Dendrogram;
use crate::libs::error::ClusterError;

/// Render the subtree below `root`: a leaf is its id, a virtual node is
/// `(left,right)`.
///
/// # Example
/// ```
/// use clustree::libs::phylo::{writer, Dendrogram};
/// let mut tree = Dendrogram::new();
/// for id in 1..=3 {
///     tree.add_leaf(id).unwrap();
/// }
/// tree.add_merge(4, 2, 3, 1.0).unwrap();
/// tree.add_merge(5, 1, 4, 2.0).unwrap();
/// assert_eq!(writer::render(&tree, 5).unwrap(), "(1,(2,3))");
/// assert_eq!(writer::render(&tree, 2).unwrap(), "2");
/// ```
pub fn render(tree: &Dendrogram, root: NodeId) -> Result<String, ClusterError> {
    render_with(tree, root, &|id| id.to_string())
}

/// Render the subtree below `root`, labelling leaves with `label`.
pub fn render_with<F>(tree: &Dendrogram, root: NodeId, label: &F) -> Result<String, ClusterError>
where
    F: Fn(NodeId) -> String,
{
    let node = tree
        .get(root)
        .ok_or_else(|| ClusterError::InvalidInput(format!("node {} not found", root)))?;

    match node.children {
        None => Ok(label(root)),
        Some((left, right)) => Ok(format!(
            "({},{})",
            render_with(tree, left, label)?,
            render_with(tree, right, label)?
        )),
    }
}

/// Serialize every root as a Newick string, one tree per line.
///
/// # Example
/// ```
/// use clustree::libs::phylo::{writer, Dendrogram};
/// let tree = Dendrogram::new();
/// assert_eq!(writer::write_newick(&tree).unwrap(), "");
/// ```
pub fn write_newick(tree: &Dendrogram) -> Result<String, ClusterError> {
    write_newick_with(tree, &|id| id.to_string())
}

/// Serialize every root as a Newick string with custom leaf labels.
pub fn write_newick_with<F>(tree: &Dendrogram, label: &F) -> Result<String, ClusterError>
where
    F: Fn(NodeId) -> String,
{
    let mut s = String::new();
    for &root in tree.roots() {
        s.push_str(&render_with(tree, root, label)?);
        s.push_str(";\n");
    }
    Ok(s)
}

/// Tab-separated merge table in creation order: `id left right score size`.
/// Leaves are shown with `label`, virtual nodes by id.
pub fn write_merges_with<F>(tree: &Dendrogram, label: &F) -> String
where
    F: Fn(NodeId) -> String,
{
    let show = |id: NodeId| match tree.get(id) {
        Some(node) if node.is_leaf() => label(id),
        _ => id.to_string(),
    };

    let mut s = String::new();
    for node in tree.merges() {
        if let (Some((left, right)), Some(score)) = (node.children, node.score) {
            s.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                node.id,
                show(left),
                show(right),
                score,
                node.size
            ));
        }
    }
    s
}

/// Quote a label if it holds Newick metacharacters.
///
/// ```
/// use clustree::libs::phylo::writer::quote_label;
/// assert_eq!(quote_label("S1"), "S1");
/// assert_eq!(quote_label("Homo sapiens"), "'Homo sapiens'");
/// ```
pub fn quote_label(label: &str) -> String {
    let needs_quote = label.chars().any(|c| "(),:;[]' \t\n".contains(c));
    if needs_quote {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
