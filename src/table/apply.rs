//! Update applier
//!
//! Writes classification results into label cells, only where a cell is
//! still empty. Best effort, never destructive: out-of-range or duplicate
//! items are no-ops, not errors.

use super::columns::LabelColumns;
use super::select::MAX_BATCH;
use super::{cell_text, set_cell_text};
use crate::doc::Node;
use crate::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

/// One classification result to write back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    /// Zero-based index among data rows
    #[serde(alias = "row_index")]
    pub row_index: usize,
    pub theme: String,
    pub impact: String,
}

/// Apply a batch of updates to a located, column-ensured table.
///
/// Per item: the row index is bounds-checked (outside `[0, rowCount)` is
/// silently dropped), theme and impact are coerced into the taxonomy, and
/// each label cell is written only if currently empty. Batches are clamped
/// to `MAX_BATCH` items. Returns the number of cells actually written.
pub fn apply_updates(
    table: &mut Node,
    columns: &LabelColumns,
    updates: &[UpdateItem],
    taxonomy: &Taxonomy,
) -> usize {
    let updates = &updates[..updates.len().min(MAX_BATCH)];
    let row_count = table.children().len().saturating_sub(1);
    let mut written = 0;

    for item in updates {
        if item.row_index >= row_count {
            continue;
        }
        let theme = taxonomy.coerce_theme(&item.theme).to_string();
        let impact = taxonomy.coerce_impact(&item.impact).to_string();

        let Some(rows) = table.content.as_mut() else {
            break;
        };
        let row = &mut rows[item.row_index + 1];

        if cell_text(row, columns.theme).is_empty() {
            set_cell_text(row, columns.theme, &theme);
            written += 1;
        }
        if cell_text(row, columns.impact).is_empty() {
            set_cell_text(row, columns.impact, &impact);
            written += 1;
        }
    }
    written
}
