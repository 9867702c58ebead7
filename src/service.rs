//! Labelling service — the consumer-facing entry point
//!
//! Every operation is a self-contained round trip: fetch the document,
//! locate the feedback table, ensure label columns, then either extract
//! unlabeled rows or apply updates, and persist. Nothing is cached between
//! round trips, so concurrent invocations against different documents are
//! fully independent and stale offsets cannot survive a header mutation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{Classifier, ClassifyError};
use crate::config::LabelConfig;
use crate::doc::{get_at_path, set_at_path, NodePath, TreeError};
use crate::store::{DocumentStore, StoreError};
use crate::table::{
    apply_updates, ensure_columns, locate_feedback_table, select_unlabeled, FeedbackRow,
    LabelColumns, TableError, UpdateItem,
};

/// Errors from labelling operations.
///
/// Structural failures propagate to the caller; per-item anomalies inside a
/// batch (bad row index, invalid taxonomy value) never surface here — they
/// are dropped or coerced by the applier.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("invalid update payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Result type for labelling operations.
pub type LabelResult<T> = Result<T, LabelError>;

/// A batch of unlabeled rows extracted from one document.
#[derive(Debug, Clone, Serialize)]
pub struct RowBatch {
    pub page_id: String,
    pub table_path: NodePath,
    pub columns: LabelColumns,
    pub rows: Vec<FeedbackRow>,
    /// Total data rows in the table, labelled or not
    pub total_rows: usize,
}

/// Summary of a full extract-classify-apply run.
#[derive(Debug, Clone, Serialize)]
pub struct LabelRun {
    /// Unlabeled rows extracted
    pub examined: usize,
    /// Rows the classifier answered for
    pub classified: usize,
    /// Cells actually written
    pub updated: usize,
}

/// Single entry point for all labelling operations.
#[derive(Clone)]
pub struct LabelService {
    store: Arc<dyn DocumentStore>,
    config: LabelConfig,
}

impl LabelService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: LabelConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LabelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Extract the next batch of unlabeled rows from a document.
    ///
    /// When the column-ensure pass had to append header columns, the widened
    /// table is persisted immediately so offsets stay stable for the apply
    /// round trip — best effort: a persist failure here is logged and does
    /// not fail the extraction.
    pub async fn next_rows(&self, page_id: &str, batch: Option<usize>) -> LabelResult<RowBatch> {
        let limit = self.config.clamped_batch(batch);
        info!(page_id, limit, "extracting unlabeled rows");

        let doc = self.store.fetch(page_id).await?;
        let mut tree = doc.tree;

        let located = locate_feedback_table(&tree)?;
        let mut table = get_at_path(&tree, &located.path)?.clone();
        let ensured = ensure_columns(&mut table)?;
        let rows = select_unlabeled(&table, &ensured.columns, limit);
        let total_rows = table.children().len().saturating_sub(1);

        if ensured.mutated {
            set_at_path(&mut tree, &located.path, table)?;
            if let Err(error) = self
                .store
                .persist(page_id, &doc.title, doc.version, &tree)
                .await
            {
                warn!(page_id, %error, "label column persist failed, continuing");
            }
        }

        info!(page_id, count = rows.len(), total_rows, "extraction complete");
        Ok(RowBatch {
            page_id: page_id.to_string(),
            table_path: located.path,
            columns: ensured.columns,
            rows,
            total_rows,
        })
    }

    /// Apply classification results to a document and persist it.
    ///
    /// The document is re-fetched and the table re-located: column offsets
    /// from an earlier extraction are never trusted across round trips.
    /// Returns the number of cells actually written.
    pub async fn apply_labels(&self, page_id: &str, updates: &[UpdateItem]) -> LabelResult<usize> {
        info!(page_id, count = updates.len(), "applying label updates");

        let doc = self.store.fetch(page_id).await?;
        let mut tree = doc.tree;

        let located = locate_feedback_table(&tree)?;
        let mut table = get_at_path(&tree, &located.path)?.clone();
        let ensured = ensure_columns(&mut table)?;
        let written = apply_updates(&mut table, &ensured.columns, updates, &self.config.taxonomy);

        set_at_path(&mut tree, &located.path, table)?;
        self.store
            .persist(page_id, &doc.title, doc.version, &tree)
            .await?;

        info!(page_id, written, "label updates persisted");
        Ok(written)
    }

    /// Parse a caller-supplied JSON payload into update items.
    ///
    /// Anything that is not a well-formed JSON array of items is rejected
    /// wholesale; malformed payloads never reach the applier.
    pub fn parse_update_items(raw: &str) -> LabelResult<Vec<UpdateItem>> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| LabelError::InvalidPayload(e.to_string()))?;
        if !value.is_array() {
            return Err(LabelError::InvalidPayload(
                "expected a JSON array of update items".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| LabelError::InvalidPayload(e.to_string()))
    }

    /// Apply a raw JSON payload of updates.
    pub async fn apply_labels_json(&self, page_id: &str, raw: &str) -> LabelResult<usize> {
        let items = Self::parse_update_items(raw)?;
        self.apply_labels(page_id, &items).await
    }

    /// Full round trip: extract a batch, classify each row, apply results.
    ///
    /// A classifier failure on one row skips that row and continues; the row
    /// stays unlabeled and will be picked up by a later run. Sub-threshold
    /// confidence is logged, never enforced.
    pub async fn label_page(
        &self,
        classifier: Arc<dyn Classifier>,
        page_id: &str,
        batch: Option<usize>,
    ) -> LabelResult<LabelRun> {
        let extracted = self.next_rows(page_id, batch).await?;

        let mut updates = Vec::new();
        for row in &extracted.rows {
            match classifier.classify(&row.subject, &row.description).await {
                Ok(classification) => {
                    let threshold = self.config.threshold_for(&classification.impact);
                    if classification.confidence < threshold {
                        debug!(
                            row = row.row_index,
                            confidence = f64::from(classification.confidence),
                            threshold = f64::from(threshold),
                            "classification below confidence threshold"
                        );
                    }
                    updates.push(UpdateItem {
                        row_index: row.row_index,
                        theme: classification.theme,
                        impact: classification.impact,
                    });
                }
                Err(error) => {
                    warn!(row = row.row_index, %error, "classification failed, skipping row");
                }
            }
        }

        let examined = extracted.rows.len();
        let classified = updates.len();
        let updated = if updates.is_empty() {
            0
        } else {
            self.apply_labels(page_id, &updates).await?
        };

        Ok(LabelRun {
            examined,
            classified,
            updated,
        })
    }
}
