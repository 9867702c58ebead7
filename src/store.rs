//! Document store — fetch and persist page bodies
//!
//! The store is a black-box collaborator: the core only needs "fetch
//! document" and "store document". Two implementations:
//! - `MemoryStore`: DashMap-backed, for tests and embedding
//! - `FileStore`: one JSON page file per document under a directory
//!
//! Persist carries the caller-supplied version and bumps it by exactly one;
//! a stale version is rejected with `StoreError::VersionConflict` and no
//! retry is performed anywhere in the core.

use crate::doc::{codec_for, kind, CodecError, Node};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("persist rejected: {0}")]
    Persist(String),

    #[error("version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u32, found: u32 },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A freshly fetched document: tree, optimistic version, and title.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub tree: Node,
    pub version: u32,
    pub title: String,
}

/// Trait for document store backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by ID.
    async fn fetch(&self, id: &str) -> Result<FetchedDocument, StoreError>;

    /// Write a document back, bumping `version` by one. Fails with
    /// `VersionConflict` when a concurrent writer changed the document
    /// between fetch and persist.
    async fn persist(
        &self,
        id: &str,
        title: &str,
        version: u32,
        tree: &Node,
    ) -> Result<(), StoreError>;
}

fn require_doc_root(id: &str, tree: &Node) -> Result<(), StoreError> {
    if tree.node_type != kind::DOC {
        return Err(StoreError::Malformed(format!(
            "page '{}' root is '{}', expected '{}'",
            id, tree.node_type, kind::DOC
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct StoredPage {
    title: String,
    version: u32,
    tree: Node,
}

/// In-memory store with optimistic version checking.
#[derive(Default)]
pub struct MemoryStore {
    pages: DashMap<String, StoredPage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a page at version 1.
    pub fn insert(&self, id: impl Into<String>, title: impl Into<String>, tree: Node) {
        self.pages.insert(
            id.into(),
            StoredPage {
                title: title.into(),
                version: 1,
                tree,
            },
        );
    }

    /// Current version of a page, if present.
    pub fn version_of(&self, id: &str) -> Option<u32> {
        self.pages.get(id).map(|p| p.version)
    }

    /// Snapshot of a page's tree, for assertions.
    pub fn tree_of(&self, id: &str) -> Option<Node> {
        self.pages.get(id).map(|p| p.tree.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, id: &str) -> Result<FetchedDocument, StoreError> {
        let page = self
            .pages
            .get(id)
            .ok_or_else(|| StoreError::Fetch(format!("page '{}' not found", id)))?;
        require_doc_root(id, &page.tree)?;
        Ok(FetchedDocument {
            tree: page.tree.clone(),
            version: page.version,
            title: page.title.clone(),
        })
    }

    async fn persist(
        &self,
        id: &str,
        title: &str,
        version: u32,
        tree: &Node,
    ) -> Result<(), StoreError> {
        let mut page = self
            .pages
            .get_mut(id)
            .ok_or_else(|| StoreError::Persist(format!("page '{}' not found", id)))?;
        if page.version != version {
            return Err(StoreError::VersionConflict {
                expected: version,
                found: page.version,
            });
        }
        page.title = title.to_string();
        page.version = version + 1;
        page.tree = tree.clone();
        Ok(())
    }
}

/// On-disk page file: metadata plus the body in its backing representation.
#[derive(Debug, Serialize, Deserialize)]
struct PageFile {
    title: String,
    version: u32,
    body: PageBody,
}

#[derive(Debug, Serialize, Deserialize)]
struct PageBody {
    /// Backing representation name ("tree" or "markup")
    representation: String,
    value: String,
}

/// File-backed store: `<dir>/<id>.json` per page.
///
/// The body's `representation` field selects the codec, so the same store
/// serves both backing representations.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn page_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Seed a page file at version 1 in the structured-tree representation.
    pub fn create(&self, id: &str, title: &str, tree: &Node) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let codec = codec_for("tree").ok_or_else(|| StoreError::Persist("no codec".into()))?;
        let page = PageFile {
            title: title.to_string(),
            version: 1,
            body: PageBody {
                representation: "tree".to_string(),
                value: codec.encode(tree)?,
            },
        };
        std::fs::write(self.page_path(id), serde_json::to_string_pretty(&page)?)?;
        Ok(())
    }

    async fn read_page(&self, id: &str) -> Result<PageFile, StoreError> {
        let path = self.page_path(id);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Fetch(format!("page '{}': {}", id, e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Malformed(format!("page '{}': {}", id, e)))
    }
}

fn page_codec(id: &str, representation: &str) -> Result<Box<dyn crate::doc::TreeCodec>, StoreError> {
    codec_for(representation).ok_or_else(|| {
        StoreError::Malformed(format!(
            "page '{}' has unknown representation '{}'",
            id, representation
        ))
    })
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn fetch(&self, id: &str) -> Result<FetchedDocument, StoreError> {
        let page = self.read_page(id).await?;
        let codec = page_codec(id, &page.body.representation)?;
        let tree = codec.decode(&page.body.value)?;
        require_doc_root(id, &tree)?;
        Ok(FetchedDocument {
            tree,
            version: page.version,
            title: page.title,
        })
    }

    async fn persist(
        &self,
        id: &str,
        title: &str,
        version: u32,
        tree: &Node,
    ) -> Result<(), StoreError> {
        let existing = self.read_page(id).await.map_err(|e| match e {
            StoreError::Fetch(msg) => StoreError::Persist(msg),
            other => other,
        })?;
        if existing.version != version {
            return Err(StoreError::VersionConflict {
                expected: version,
                found: existing.version,
            });
        }
        let codec = page_codec(id, &existing.body.representation)?;
        let page = PageFile {
            title: title.to_string(),
            version: version + 1,
            body: PageBody {
                representation: existing.body.representation,
                value: codec.encode(tree)?,
            },
        };
        tokio::fs::write(self.page_path(id), serde_json::to_string_pretty(&page)?)
            .await
            .map_err(|e| StoreError::Persist(format!("page '{}': {}", id, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Node;

    fn doc() -> Node {
        Node::container(kind::DOC, vec![Node::paragraph("hello")])
    }

    #[tokio::test]
    async fn memory_fetch_round_trip() {
        let store = MemoryStore::new();
        store.insert("p1", "Feedback", doc());

        let fetched = store.fetch("p1").await.unwrap();
        assert_eq!(fetched.version, 1);
        assert_eq!(fetched.title, "Feedback");
        assert_eq!(fetched.tree, doc());
    }

    #[tokio::test]
    async fn memory_fetch_missing_page_fails() {
        let store = MemoryStore::new();
        let err = store.fetch("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(_)));
    }

    #[tokio::test]
    async fn memory_fetch_rejects_non_doc_root() {
        let store = MemoryStore::new();
        store.insert("p1", "Feedback", Node::paragraph("not a doc"));
        let err = store.fetch("p1").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[tokio::test]
    async fn memory_persist_bumps_version_by_one() {
        let store = MemoryStore::new();
        store.insert("p1", "Feedback", doc());

        store.persist("p1", "Feedback", 1, &doc()).await.unwrap();
        assert_eq!(store.version_of("p1"), Some(2));
    }

    #[tokio::test]
    async fn memory_stale_persist_is_a_version_conflict() {
        let store = MemoryStore::new();
        store.insert("p1", "Feedback", doc());
        store.persist("p1", "Feedback", 1, &doc()).await.unwrap();

        // second writer still holds version 1
        let err = store.persist("p1", "Feedback", 1, &doc()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 1,
                found: 2
            }
        ));
    }

    #[tokio::test]
    async fn file_store_round_trip_and_version_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.create("p1", "Feedback", &doc()).unwrap();

        let fetched = store.fetch("p1").await.unwrap();
        assert_eq!(fetched.version, 1);
        assert_eq!(fetched.tree, doc());

        store.persist("p1", "Feedback", 1, &fetched.tree).await.unwrap();
        let again = store.fetch("p1").await.unwrap();
        assert_eq!(again.version, 2);

        let err = store.persist("p1", "Feedback", 1, &doc()).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn file_store_missing_page_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.fetch("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(_)));
    }

    #[tokio::test]
    async fn file_store_garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let store = FileStore::new(dir.path());
        let err = store.fetch("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[tokio::test]
    async fn file_store_serves_markup_pages() {
        let dir = tempfile::tempdir().unwrap();
        let page = PageFile {
            title: "Feedback".to_string(),
            version: 1,
            body: PageBody {
                representation: "markup".to_string(),
                value: "<p>hello</p>".to_string(),
            },
        };
        std::fs::write(
            dir.path().join("m1.json"),
            serde_json::to_string(&page).unwrap(),
        )
        .unwrap();

        let store = FileStore::new(dir.path());
        let fetched = store.fetch("m1").await.unwrap();
        assert_eq!(fetched.tree.node_type, kind::DOC);
        assert_eq!(fetched.tree.children()[0].inner_text(), "hello");

        // persist keeps the page in its markup representation
        store.persist("m1", "Feedback", 1, &fetched.tree).await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join("m1.json")).unwrap();
        assert!(raw.contains("markup"));
        assert!(raw.contains("<p>hello</p>"));
    }
}
