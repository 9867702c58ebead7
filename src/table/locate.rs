//! Table locator
//!
//! Finds the first table in the document whose header row names both
//! required feedback columns.

use super::{matches_header, TableError};
use crate::doc::{find_nodes, kind, Node, NodePath};
use serde::Serialize;

/// Column offsets into each row of a located table.
///
/// `theme` / `impact` are absent until the table has been augmented; they
/// are recomputed from scratch on every locate because header mutation can
/// shift offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub subject: usize,
    pub description: usize,
    pub theme: Option<usize>,
    pub impact: Option<usize>,
}

/// A table discovered by the locator, addressed by its path.
#[derive(Debug, Clone)]
pub struct LocatedTable {
    pub path: NodePath,
    pub columns: ColumnMap,
}

/// Scan a table's header row for the known columns.
///
/// Returns `None` when the table has no header row or lacks either required
/// column, in which case the locator moves on to the next table.
pub(crate) fn scan_header(table: &Node) -> Option<ColumnMap> {
    let header = table.children().first()?;
    let names: Vec<String> = header
        .children()
        .iter()
        .map(|cell| cell.inner_text())
        .collect();

    let subject = names.iter().position(|n| matches_header(n, "subject"))?;
    let description = names.iter().position(|n| matches_header(n, "description"))?;
    Some(ColumnMap {
        subject,
        description,
        theme: names.iter().position(|n| matches_header(n, "theme")),
        impact: names.iter().position(|n| matches_header(n, "impact")),
    })
}

/// Find the first table (document order) whose header row contains a
/// "subject" and a "description" column, by loose case-insensitive match.
///
/// Tables that don't qualify are skipped; `TableError::NotFound` when none
/// qualify.
pub fn locate_feedback_table(root: &Node) -> Result<LocatedTable, TableError> {
    for (path, table) in find_nodes(root, |n| n.node_type == kind::TABLE) {
        if let Some(columns) = scan_header(table) {
            return Ok(LocatedTable { path, columns });
        }
    }
    Err(TableError::NotFound)
}
