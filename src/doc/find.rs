//! Document-order traversal

use super::node::Node;
use super::path::NodePath;

/// Depth-first search returning every node satisfying `predicate`, paired
/// with its path from `root`.
///
/// Traversal uses an explicit stack with children pushed in reverse, so
/// results come back in document order and "first match" semantics hold for
/// table discovery.
pub fn find_nodes<'a, F>(root: &'a Node, predicate: F) -> Vec<(NodePath, &'a Node)>
where
    F: Fn(&Node) -> bool,
{
    let mut found = Vec::new();
    let mut stack: Vec<(NodePath, &Node)> = vec![(NodePath::root(), root)];
    while let Some((path, node)) = stack.pop() {
        if predicate(node) {
            found.push((path.clone(), node));
        }
        for (index, child) in node.children().iter().enumerate().rev() {
            stack.push((path.child(index), child));
        }
    }
    found
}
