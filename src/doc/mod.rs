//! Document tree primitives
//!
//! A page body is a tree of typed nodes. Two backing representations
//! (structured JSON and HTML storage markup) decode into the same `Node`
//! type; everything above this module is written once against `Node`.

mod codec;
mod find;
mod node;
mod path;

pub use codec::{codec_for, AdfCodec, CodecError, HtmlCodec, TreeCodec};
pub use find::find_nodes;
pub use node::{kind, Node};
pub use path::{get_at_path, get_at_path_mut, set_at_path, NodePath, TreeError};
