//! Feedback table operations
//!
//! Locates the semantically relevant table, manages its label columns,
//! extracts unlabeled rows, and applies classification results without ever
//! overwriting an existing label.

mod apply;
mod columns;
mod locate;
mod select;

pub use apply::{apply_updates, UpdateItem};
pub use columns::{ensure_columns, EnsuredColumns, LabelColumns};
pub use locate::{locate_feedback_table, ColumnMap, LocatedTable};
pub use select::{select_unlabeled, FeedbackRow, MAX_BATCH};

use crate::doc::Node;
use thiserror::Error;

/// Errors from table discovery and column management.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("no feedback table with 'Subject' and 'Description' columns")]
    NotFound,

    #[error("table has no header row")]
    MissingHeader,
}

/// Trimmed text of the cell at `col`, or empty when the column is missing.
pub(crate) fn cell_text(row: &Node, col: usize) -> String {
    row.children()
        .get(col)
        .map(|cell| cell.inner_text().trim().to_string())
        .unwrap_or_default()
}

/// Loose header match: trimmed, lowercased cell text containing the needle.
///
/// Containment subsumes equality, so "Subject", "subject:" and
/// "Subject Line Reviewed" all match "subject". Deliberately tolerant of
/// punctuation and pluralization drift in authored headers.
pub(crate) fn matches_header(cell_text: &str, needle: &str) -> bool {
    cell_text.trim().to_lowercase().contains(needle)
}

/// Replace the cell at `col` with a single paragraph holding `text`,
/// preserving the existing cell kind (header vs data). A missing cell is
/// created, with empty cells filling any gap before it.
pub(crate) fn set_cell_text(row: &mut Node, col: usize, text: &str) {
    let cell_kind = row
        .children()
        .get(col)
        .map(|cell| cell.node_type.clone())
        .unwrap_or_else(|| crate::doc::kind::TABLE_CELL.to_string());
    let cell = Node::container(cell_kind, vec![Node::paragraph(text)]);
    let cells = row.content.get_or_insert_with(Vec::new);
    while cells.len() < col {
        cells.push(Node::empty_cell());
    }
    if col < cells.len() {
        cells[col] = cell;
    } else {
        cells.push(cell);
    }
}
