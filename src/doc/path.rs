//! Path-addressed access into the document tree

use super::node::Node;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from path-addressed tree access.
///
/// An invalid path during an apply pass indicates a locator bug, not bad
/// input, and is treated as fatal by callers.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid path: {0}")]
    InvalidPath(NodePath),
}

/// An ordered sequence of child indices descending from the document root.
///
/// The empty path denotes the root, which is never a valid mutation target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root path (empty).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// The path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        let joined = self
            .0
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

/// Resolve a path to the node it addresses.
pub fn get_at_path<'a>(root: &'a Node, path: &NodePath) -> Result<&'a Node, TreeError> {
    let mut current = root;
    for &index in path.segments() {
        current = current
            .children()
            .get(index)
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
    }
    Ok(current)
}

/// Resolve a path to a mutable reference.
pub fn get_at_path_mut<'a>(root: &'a mut Node, path: &NodePath) -> Result<&'a mut Node, TreeError> {
    let mut current = root;
    for &index in path.segments() {
        current = current
            .content
            .as_mut()
            .and_then(|children| children.get_mut(index))
            .ok_or_else(|| TreeError::InvalidPath(path.clone()))?;
    }
    Ok(current)
}

/// Replace the node at a non-empty path.
///
/// Root replacement is disallowed; the empty path is an invalid target.
pub fn set_at_path(root: &mut Node, path: &NodePath, node: Node) -> Result<(), TreeError> {
    if path.is_root() {
        return Err(TreeError::InvalidPath(path.clone()));
    }
    let target = get_at_path_mut(root, path)?;
    *target = node;
    Ok(())
}
