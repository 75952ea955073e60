//! Linearization of the finding-aid tree.

use super::types::FindingAidNode;

/// Every node below `node`, depth-first in document order.
///
/// For each child the child itself is emitted, followed by its own
/// flattened descendants, before moving on to the next sibling. The node
/// passed in is not part of the output.
pub fn flatten(node: &FindingAidNode) -> Vec<&FindingAidNode> {
    let mut out = Vec::new();
    for child in node.children() {
        out.push(child);
        if !child.is_leaf() {
            out.extend(flatten(child));
        }
    }
    out
}

/// File-level units below `node`, sorted by path.
pub fn leaves(node: &FindingAidNode) -> Vec<&FindingAidNode> {
    let mut leaves: Vec<_> = flatten(node)
        .into_iter()
        .filter(|n| n.is_leaf())
        .collect();
    leaves.sort_by(|a, b| a.path.cmp(&b.path));
    leaves
}
