//! Node representation of rich-text document content

use serde::{Deserialize, Serialize};

/// Well-known node type tags.
///
/// The tree is content-agnostic; these are the types the table operations
/// care about. Unknown types pass through untouched.
pub mod kind {
    pub const DOC: &str = "doc";
    pub const TABLE: &str = "table";
    pub const TABLE_ROW: &str = "tableRow";
    pub const TABLE_HEADER: &str = "tableHeader";
    pub const TABLE_CELL: &str = "tableCell";
    pub const PARAGRAPH: &str = "paragraph";
    pub const TEXT: &str = "text";
}

/// A node in the document tree.
///
/// Discriminated by a `type` tag. Container nodes carry an ordered `content`
/// sequence; text leaves carry a `text` payload. Constructors never set both.
/// Fields the core does not interpret (`attrs`, `marks`, ...) are preserved
/// through `extra` so a fetch/mutate/persist round trip keeps authored
/// content intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Type tag (e.g. "table", "tableRow", "paragraph", "text")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Text payload — leaf nodes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Ordered children — container nodes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    /// Uninterpreted fields, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    /// Create a container node with the given children.
    pub fn container(node_type: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            node_type: node_type.into(),
            text: None,
            content: Some(children),
            extra: serde_json::Map::new(),
        }
    }

    /// Create a text leaf.
    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            node_type: kind::TEXT.to_string(),
            text: Some(payload.into()),
            content: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Create a paragraph. Empty input yields a paragraph with no text leaf.
    pub fn paragraph(text: &str) -> Self {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(text)]
        };
        Self::container(kind::PARAGRAPH, children)
    }

    /// Create a data cell wrapping a single paragraph.
    pub fn table_cell(text: &str) -> Self {
        Self::container(kind::TABLE_CELL, vec![Self::paragraph(text)])
    }

    /// Create a header cell wrapping a single paragraph.
    pub fn header_cell(text: &str) -> Self {
        Self::container(kind::TABLE_HEADER, vec![Self::paragraph(text)])
    }

    /// Create an empty data cell, as used when padding rows to a new width.
    pub fn empty_cell() -> Self {
        Self::table_cell("")
    }

    /// Children of this node, or an empty slice for leaves.
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// True when this node is a container (has a `content` sequence).
    pub fn is_container(&self) -> bool {
        self.content.is_some()
    }

    /// Concatenate every leaf text payload under this node, depth-first in
    /// document order.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            for child in node.children().iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}
