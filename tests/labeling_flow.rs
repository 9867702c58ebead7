//! End-to-end labelling flows over an in-memory store.

mod common;

use common::{cell_text_at, feedback_doc, row_widths};
use rowlabel::{
    Classification, LabelError, LabelService, MemoryStore, MockClassifier, StoreError, TableError,
    UpdateItem,
};
use std::sync::Arc;

fn service_with(doc: rowlabel::Node) -> (LabelService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.insert("page", "Customer Feedback", doc);
    (LabelService::new(store.clone()), store)
}

fn update(row_index: usize, theme: &str, impact: &str) -> UpdateItem {
    UpdateItem {
        row_index,
        theme: theme.to_string(),
        impact: impact.to_string(),
    }
}

#[tokio::test]
async fn extraction_widens_the_table_and_returns_unlabeled_rows() {
    let doc = feedback_doc(
        &["Subject", "Description"],
        &[
            &["Export fails", "CSV export times out"],
            &["Add dark mode", "Please add a dark theme"],
            &["", ""],
        ],
    );
    let (service, store) = service_with(doc);

    let batch = service.next_rows("page", None).await.unwrap();

    // the fully empty row is skipped; ordering follows the table
    assert_eq!(batch.rows.len(), 2);
    assert_eq!(batch.rows[0].row_index, 0);
    assert_eq!(batch.rows[0].subject, "Export fails");
    assert_eq!(batch.rows[1].row_index, 1);
    assert_eq!(batch.total_rows, 3);
    assert_eq!(batch.columns.theme, 2);
    assert_eq!(batch.columns.impact, 3);

    // the widened header was persisted immediately (version bumped by one)
    assert_eq!(store.version_of("page"), Some(2));
    let tree = store.tree_of("page").unwrap();
    assert_eq!(row_widths(&tree), vec![4, 4, 4, 4]);
    assert_eq!(cell_text_at(&tree, 0, 2), "");
}

#[tokio::test]
async fn extraction_without_header_mutation_does_not_persist() {
    let doc = feedback_doc(
        &["Subject", "Description", "Theme", "Impact"],
        &[&["Slow search", "Queries take 30s", "", ""]],
    );
    let (service, store) = service_with(doc);

    let batch = service.next_rows("page", None).await.unwrap();
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(store.version_of("page"), Some(1));
}

#[tokio::test]
async fn ragged_rows_are_padded_before_labels_are_written() {
    // header already carries Theme/Impact, but the data row is two cells
    // short of it, as markup-authored tables often are
    let doc = feedback_doc(
        &["Subject", "Description", "Theme", "Impact"],
        &[&["Export fails", "CSV export times out"]],
    );
    let (service, store) = service_with(doc);

    let written = service
        .apply_labels("page", &[update(0, "Bug Report", "High")])
        .await
        .unwrap();
    assert_eq!(written, 2);

    let tree = store.tree_of("page").unwrap();
    assert_eq!(row_widths(&tree), vec![4, 4]);
    assert_eq!(cell_text_at(&tree, 0, 2), "Bug Report");
    assert_eq!(cell_text_at(&tree, 0, 3), "High");
}

#[tokio::test]
async fn apply_fills_only_empty_cells() {
    let doc = feedback_doc(
        &["Subject", "Description", "Theme", "Impact"],
        &[&["Export fails", "CSV export times out", "Feature Request", ""]],
    );
    let (service, store) = service_with(doc);

    let written = service
        .apply_labels("page", &[update(0, "Bug Report", "High")])
        .await
        .unwrap();

    // theme already had a label and is untouched; only impact was written
    assert_eq!(written, 1);
    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 0, 2), "Feature Request");
    assert_eq!(cell_text_at(&tree, 0, 3), "High");
}

#[tokio::test]
async fn applying_the_same_batch_twice_is_a_no_op() {
    let doc = feedback_doc(
        &["Subject", "Description", "Theme", "Impact"],
        &[&["Export fails", "CSV export times out", "", ""]],
    );
    let (service, store) = service_with(doc);
    let batch = [update(0, "Bug Report", "High")];

    assert_eq!(service.apply_labels("page", &batch).await.unwrap(), 2);
    assert_eq!(service.apply_labels("page", &batch).await.unwrap(), 0);

    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 0, 2), "Bug Report");
    assert_eq!(cell_text_at(&tree, 0, 3), "High");
}

#[tokio::test]
async fn out_of_range_and_duplicate_updates_are_silently_dropped() {
    let doc = feedback_doc(
        &["Subject", "Description", "Theme", "Impact"],
        &[&["Export fails", "CSV export times out", "", ""]],
    );
    let (service, store) = service_with(doc);

    let written = service
        .apply_labels(
            "page",
            &[
                update(7, "Bug Report", "High"),
                update(0, "Usability", "Medium"),
                update(0, "Performance", "Low"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(written, 2);
    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 0, 2), "Usability");
    assert_eq!(cell_text_at(&tree, 0, 3), "Medium");
}

#[tokio::test]
async fn full_label_run_classifies_and_writes_back() {
    let doc = feedback_doc(
        &["Subject", "Description"],
        &[
            &["Export fails", "CSV export times out"],
            &["Add dark mode", "Please add a dark theme"],
        ],
    );
    let (service, store) = service_with(doc);

    let classifier = Arc::new(
        MockClassifier::new()
            .with_response("Export fails", Classification::new("Bug Report", "High", 0.9))
            .with_response(
                "Add dark mode",
                Classification::new("Feature Request", "Low", 0.85),
            ),
    );

    let run = service
        .label_page(classifier.clone(), "page", None)
        .await
        .unwrap();
    assert_eq!(run.examined, 2);
    assert_eq!(run.classified, 2);
    assert_eq!(run.updated, 4);

    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 0, 2), "Bug Report");
    assert_eq!(cell_text_at(&tree, 0, 3), "High");
    assert_eq!(cell_text_at(&tree, 1, 2), "Feature Request");
    assert_eq!(cell_text_at(&tree, 1, 3), "Low");

    // everything labeled now: a second run finds nothing to do
    let again = service.label_page(classifier, "page", None).await.unwrap();
    assert_eq!(again.examined, 0);
    assert_eq!(again.updated, 0);
}

#[tokio::test]
async fn classifier_failure_skips_the_row_and_continues() {
    let doc = feedback_doc(
        &["Subject", "Description"],
        &[
            &["Export fails", "CSV export times out"],
            &["Add dark mode", "Please add a dark theme"],
        ],
    );
    let (service, store) = service_with(doc);

    // only one subject has a registered response; the other row errors
    let classifier = Arc::new(
        MockClassifier::new()
            .with_response("Export fails", Classification::new("Bug Report", "High", 0.9)),
    );

    let run = service.label_page(classifier, "page", None).await.unwrap();
    assert_eq!(run.examined, 2);
    assert_eq!(run.classified, 1);
    assert_eq!(run.updated, 2);

    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 1, 2), "");
    assert_eq!(cell_text_at(&tree, 1, 3), "");
}

#[tokio::test]
async fn taxonomy_violations_are_coerced_before_writing() {
    let doc = feedback_doc(
        &["Subject", "Description"],
        &[&["Export fails", "CSV export times out"]],
    );
    let (service, store) = service_with(doc);

    let classifier = Arc::new(
        MockClassifier::new().with_fallback(Classification::new("Nonsense", "Catastrophic", 0.99)),
    );

    let run = service.label_page(classifier, "page", None).await.unwrap();
    assert_eq!(run.updated, 2);

    let tree = store.tree_of("page").unwrap();
    assert_eq!(cell_text_at(&tree, 0, 2), "Other");
    assert_eq!(cell_text_at(&tree, 0, 3), "Low");
}

#[tokio::test]
async fn malformed_payload_is_rejected_wholesale() {
    let doc = feedback_doc(&["Subject", "Description"], &[&["s", "d"]]);
    let (service, _store) = service_with(doc);

    let err = service
        .apply_labels_json("page", r#"{"rowIndex":0,"theme":"Bug Report","impact":"High"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, LabelError::InvalidPayload(_)));
}

#[tokio::test]
async fn missing_feedback_table_is_reported() {
    let doc = feedback_doc(&["Date", "Owner"], &[&["2024-01-01", "sam"]]);
    let (service, _store) = service_with(doc);

    let err = service.next_rows("page", None).await.unwrap_err();
    assert!(matches!(err, LabelError::Table(TableError::NotFound)));
}

#[tokio::test]
async fn missing_page_is_a_fetch_error() {
    let store = Arc::new(MemoryStore::new());
    let service = LabelService::new(store);

    let err = service.next_rows("ghost", None).await.unwrap_err();
    assert!(matches!(err, LabelError::Store(StoreError::Fetch(_))));
}
