//! Row selector
//!
//! Scans data rows for a bounded batch of rows that still need labels.

use super::cell_text;
use super::columns::LabelColumns;
use crate::doc::Node;
use serde::{Deserialize, Serialize};

/// Hard cap on rows per extraction or update batch. Caller-supplied limits
/// are clamped, never rejected.
pub const MAX_BATCH: usize = 20;

/// An unlabeled data row, extracted for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRow {
    /// Zero-based index among data rows (the header row is excluded)
    pub row_index: usize,
    pub subject: String,
    pub description: String,
}

/// Collect up to `limit` unlabeled rows, in original table order.
///
/// A row qualifies when its subject or description is non-empty and both
/// label cells are empty. Ordering is a strict invariant: earliest unlabeled
/// row first, so repeated batched calls make monotonic progress.
pub fn select_unlabeled(table: &Node, columns: &LabelColumns, limit: usize) -> Vec<FeedbackRow> {
    let limit = limit.min(MAX_BATCH);
    let mut selected = Vec::new();
    if limit == 0 {
        return selected;
    }

    for (row_index, row) in table.children().iter().skip(1).enumerate() {
        let subject = cell_text(row, columns.subject);
        let description = cell_text(row, columns.description);
        if subject.is_empty() && description.is_empty() {
            continue;
        }
        if !cell_text(row, columns.theme).is_empty() || !cell_text(row, columns.impact).is_empty() {
            continue;
        }
        selected.push(FeedbackRow {
            row_index,
            subject,
            description,
        });
        if selected.len() >= limit {
            break;
        }
    }
    selected
}
