//! Rowlabel: Idempotent feedback-table labelling for rich-text documents
//!
//! Locates a feedback table inside an arbitrarily nested document tree,
//! guarantees it carries Theme/Impact label columns, extracts unlabeled
//! rows for an external classifier, and writes results back without ever
//! overwriting an existing label.
//!
//! # Core Concepts
//!
//! - **Document tree**: typed nodes with ordered children; two backing
//!   representations (structured JSON and HTML markup) decode into the same
//!   `Node` type
//! - **Table locator**: finds the first table whose header names the
//!   required feedback columns, by loose case-insensitive match
//! - **Idempotent apply**: a label cell is written only while it is empty,
//!   so repeated or concurrent passes never clobber an assigned label
//!
//! # Example
//!
//! ```
//! use rowlabel::{kind, locate_feedback_table, Node};
//!
//! let doc = Node::container(
//!     kind::DOC,
//!     vec![Node::container(
//!         kind::TABLE,
//!         vec![Node::container(
//!             kind::TABLE_ROW,
//!             vec![Node::header_cell("Subject"), Node::header_cell("Description")],
//!         )],
//!     )],
//! );
//!
//! let located = locate_feedback_table(&doc).unwrap();
//! assert_eq!(located.path.to_string(), "0");
//! ```

pub mod classify;
pub mod config;
pub mod doc;
pub mod prompt;
pub mod service;
pub mod store;
pub mod table;
pub mod taxonomy;

pub use classify::{parse_classification, Classification, Classifier, ClassifyError, MockClassifier};
pub use config::{ConfigError, LabelConfig};
pub use doc::{
    codec_for, find_nodes, get_at_path, get_at_path_mut, kind, set_at_path, AdfCodec, CodecError,
    HtmlCodec, Node, NodePath, TreeCodec, TreeError,
};
pub use prompt::classification_prompt;
pub use service::{LabelError, LabelResult, LabelRun, LabelService, RowBatch};
pub use store::{DocumentStore, FetchedDocument, FileStore, MemoryStore, StoreError};
pub use table::{
    apply_updates, ensure_columns, locate_feedback_table, select_unlabeled, ColumnMap,
    EnsuredColumns, FeedbackRow, LabelColumns, LocatedTable, TableError, UpdateItem, MAX_BATCH,
};
pub use taxonomy::Taxonomy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
