//! Column manager
//!
//! Guarantees a located table carries "Theme" and "Impact" label columns,
//! padding every data row to the widened header.

use super::locate::scan_header;
use super::TableError;
use crate::doc::Node;
use serde::Serialize;

/// Column offsets after augmentation — all four always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelColumns {
    pub subject: usize,
    pub description: usize,
    pub theme: usize,
    pub impact: usize,
}

/// Outcome of a column-ensure pass.
#[derive(Debug, Clone)]
pub struct EnsuredColumns {
    pub columns: LabelColumns,
    /// True when header cells were appended or data rows padded; callers
    /// decide whether the mutation is worth persisting.
    pub mutated: bool,
}

/// Ensure the table's header row has "Theme" and "Impact" columns.
///
/// Missing header cells are appended with canonical label text, and every
/// data row is padded with empty cells so all rows keep the header's width.
/// Idempotent: presence is detected by the loose header match, never by
/// counting, so a second call appends nothing.
pub fn ensure_columns(table: &mut Node) -> Result<EnsuredColumns, TableError> {
    if table.children().is_empty() {
        return Err(TableError::MissingHeader);
    }
    let map = scan_header(table).ok_or(TableError::NotFound)?;

    let rows = table.content.as_mut().ok_or(TableError::MissingHeader)?;
    let mut mutated = false;

    let (theme, impact) = {
        let header_cells = rows[0].content.get_or_insert_with(Vec::new);
        let theme = match map.theme {
            Some(index) => index,
            None => {
                header_cells.push(Node::header_cell("Theme"));
                mutated = true;
                header_cells.len() - 1
            }
        };
        let impact = match map.impact {
            Some(index) => index,
            None => {
                header_cells.push(Node::header_cell("Impact"));
                mutated = true;
                header_cells.len() - 1
            }
        };
        (theme, impact)
    };

    // Rows can arrive shorter than the header even when no cell was
    // appended, so padding never hides behind the header check.
    let width = rows[0].children().len();
    for row in rows.iter_mut().skip(1) {
        let cells = row.content.get_or_insert_with(Vec::new);
        while cells.len() < width {
            cells.push(Node::empty_cell());
            mutated = true;
        }
    }

    Ok(EnsuredColumns {
        columns: LabelColumns {
            subject: map.subject,
            description: map.description,
            theme,
            impact,
        },
        mutated,
    })
}
