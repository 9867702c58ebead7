//! Shared builders for integration tests

use rowlabel::{kind, locate_feedback_table, Node};

pub fn header_row(headers: &[&str]) -> Node {
    Node::container(
        kind::TABLE_ROW,
        headers.iter().map(|h| Node::header_cell(h)).collect(),
    )
}

pub fn data_row(cells: &[&str]) -> Node {
    Node::container(
        kind::TABLE_ROW,
        cells.iter().map(|c| Node::table_cell(c)).collect(),
    )
}

/// A document with an intro paragraph followed by one feedback table.
pub fn feedback_doc(headers: &[&str], rows: &[&[&str]]) -> Node {
    let mut table_rows = vec![header_row(headers)];
    table_rows.extend(rows.iter().map(|cells| data_row(cells)));
    Node::container(
        kind::DOC,
        vec![
            Node::paragraph("Collected feedback"),
            Node::container(kind::TABLE, table_rows),
        ],
    )
}

/// The feedback table inside a stored tree.
pub fn feedback_table(tree: &Node) -> &Node {
    let located = locate_feedback_table(tree).expect("document should contain a feedback table");
    rowlabel::get_at_path(tree, &located.path).expect("located path should resolve")
}

/// Trimmed text of a data-row cell in the stored tree.
pub fn cell_text_at(tree: &Node, row_index: usize, col: usize) -> String {
    let table = feedback_table(tree);
    table.children()[row_index + 1].children()[col]
        .inner_text()
        .trim()
        .to_string()
}

/// Widths of every row in the stored tree's feedback table.
pub fn row_widths(tree: &Node) -> Vec<usize> {
    feedback_table(tree)
        .children()
        .iter()
        .map(|row| row.children().len())
        .collect()
}
