//! Backing-representation codecs
//!
//! The same document can be stored as a structured node tree (JSON) or as
//! HTML storage markup. Each representation gets a codec adapter; the table
//! operations only ever see `Node`.

use super::node::{kind, Node};
use thiserror::Error;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Errors decoding or encoding a backing representation.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed markup: {0}")]
    Markup(String),

    #[error("unexpected document structure: {0}")]
    Structure(String),
}

/// A document backing representation.
///
/// `decode` produces a tree rooted at a `doc` node; `encode` is its inverse.
pub trait TreeCodec: Send + Sync {
    fn decode(&self, raw: &str) -> Result<Node, CodecError>;
    fn encode(&self, tree: &Node) -> Result<String, CodecError>;
}

/// Resolve a codec from a representation name.
pub fn codec_for(representation: &str) -> Option<Box<dyn TreeCodec>> {
    match representation {
        "tree" | "adf" | "atlas_doc_format" => Some(Box::new(AdfCodec)),
        "markup" | "html" | "storage" => Some(Box::new(HtmlCodec)),
        _ => None,
    }
}

/// Structured node tree, serialized as JSON.
pub struct AdfCodec;

impl TreeCodec for AdfCodec {
    fn decode(&self, raw: &str) -> Result<Node, CodecError> {
        let tree: Node = serde_json::from_str(raw)?;
        if tree.node_type != kind::DOC {
            return Err(CodecError::Structure(format!(
                "expected '{}' root, found '{}'",
                kind::DOC,
                tree.node_type
            )));
        }
        Ok(tree)
    }

    fn encode(&self, tree: &Node) -> Result<String, CodecError> {
        Ok(serde_json::to_string(tree)?)
    }
}

/// HTML storage markup.
///
/// Fixed tag mapping for the elements the table operations care about;
/// unknown tags pass through with the tag name as the node type. Decoded
/// trees are wrapped in a `doc` root so both representations look identical
/// to the core.
pub struct HtmlCodec;

fn type_for_tag(tag: &str) -> String {
    match tag {
        "table" => kind::TABLE.to_string(),
        "tr" => kind::TABLE_ROW.to_string(),
        "th" => kind::TABLE_HEADER.to_string(),
        "td" => kind::TABLE_CELL.to_string(),
        "p" => kind::PARAGRAPH.to_string(),
        other => other.to_string(),
    }
}

fn tag_for_type(node_type: &str) -> &str {
    match node_type {
        kind::TABLE => "table",
        kind::TABLE_ROW => "tr",
        kind::TABLE_HEADER => "th",
        kind::TABLE_CELL => "td",
        kind::PARAGRAPH => "p",
        other => other,
    }
}

impl HtmlCodec {
    fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), CodecError> {
        if node.node_type == kind::TEXT {
            let text = node.text.as_deref().unwrap_or("");
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| CodecError::Markup(e.to_string()))?;
            return Ok(());
        }

        let tag = tag_for_type(&node.node_type);
        writer
            .write_event(Event::Start(BytesStart::new(tag)))
            .map_err(|e| CodecError::Markup(e.to_string()))?;
        for child in node.children() {
            Self::write_node(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(|e| CodecError::Markup(e.to_string()))?;
        Ok(())
    }
}

impl TreeCodec for HtmlCodec {
    fn decode(&self, raw: &str) -> Result<Node, CodecError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Node> = vec![Node::container(kind::DOC, Vec::new())];
        loop {
            let event = reader
                .read_event()
                .map_err(|e| CodecError::Markup(e.to_string()))?;
            match event {
                Event::Start(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    stack.push(Node::container(type_for_tag(&tag), Vec::new()));
                }
                Event::Empty(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let node = Node::container(type_for_tag(&tag), Vec::new());
                    if let Some(parent) = stack.last_mut() {
                        parent.content.get_or_insert_with(Vec::new).push(node);
                    }
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(CodecError::Markup("unexpected closing tag".to_string()));
                    }
                    let node = stack
                        .pop()
                        .ok_or_else(|| CodecError::Markup("unbalanced markup".to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.content.get_or_insert_with(Vec::new).push(node);
                    }
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| CodecError::Markup(e.to_string()))?;
                    if !text.is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent
                                .content
                                .get_or_insert_with(Vec::new)
                                .push(Node::text(text.into_owned()));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(CodecError::Markup("unclosed element".to_string()));
        }
        stack
            .pop()
            .ok_or_else(|| CodecError::Markup("empty document".to_string()))
    }

    fn encode(&self, tree: &Node) -> Result<String, CodecError> {
        let mut writer = Writer::new(Vec::new());
        // The doc root is implicit in markup form; emit only its children.
        for child in tree.children() {
            Self::write_node(&mut writer, child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| CodecError::Markup(e.to_string()))
    }
}
