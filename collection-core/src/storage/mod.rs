//! Pluggable Content Storage
//!
//! The migration drivers read and write content through the [`ContentStore`]
//! trait. Two backends are provided:
//!
//! - `InMemoryContentStore`: a map of path to item, used by tests and as the
//!   working copy of the file backend
//! - `FileContentStore`: a JSON document on disk, loaded on open and written
//!   back on [`ContentStore::flush`]
//!
//! # Example
//!
//! ```rust
//! use collection_core::content::{CollectionObject, Metadata};
//! use collection_core::storage::{ContentStore, InMemoryContentStore};
//!
//! let store = InMemoryContentStore::new();
//! store
//!     .put(CollectionObject::new("/plone/news", Metadata::new("news")).into())
//!     .unwrap();
//! assert_eq!(store.paths_by_type("Collection").unwrap(), vec!["/plone/news"]);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::error::{MigrationError, Result};

/// Storage backend trait for content objects
///
/// All methods take `&self` to allow for interior mutability patterns.
pub trait ContentStore: Send + Sync {
    /// Get the object at `path`
    fn get(&self, path: &str) -> Result<ContentItem>;

    /// Insert or replace the object at its own path
    fn put(&self, item: ContentItem) -> Result<()>;

    /// Delete the object at `path`
    fn remove(&self, path: &str) -> Result<()>;

    /// Paths of all objects of a portal type, in catalog order
    fn paths_by_type(&self, portal_type: &str) -> Result<Vec<String>>;

    /// Number of stored objects
    fn len(&self) -> Result<usize>;

    /// Persist pending changes
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Get backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// On-disk document layout: `{"items": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/// In-memory content store (default)
///
/// Objects are kept in path order. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    items: RwLock<BTreeMap<String, ContentItem>>,
}

impl InMemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store holding `items`
    pub fn from_items<I: IntoIterator<Item = ContentItem>>(items: I) -> Self {
        Self {
            items: RwLock::new(
                items
                    .into_iter()
                    .map(|item| (item.path().to_string(), item))
                    .collect(),
            ),
        }
    }

    /// Snapshot of every stored object
    pub fn items(&self) -> Result<Vec<ContentItem>> {
        let items = self.items.read().map_err(|_| MigrationError::StorageLocked)?;
        Ok(items.values().cloned().collect())
    }
}

impl ContentStore for InMemoryContentStore {
    fn get(&self, path: &str) -> Result<ContentItem> {
        let items = self.items.read().map_err(|_| MigrationError::StorageLocked)?;
        items
            .get(path)
            .cloned()
            .ok_or_else(|| MigrationError::ContentNotFound {
                path: path.to_string(),
            })
    }

    fn put(&self, item: ContentItem) -> Result<()> {
        let mut items = self.items.write().map_err(|_| MigrationError::StorageLocked)?;
        items.insert(item.path().to_string(), item);
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| MigrationError::StorageLocked)?;
        items.remove(path);
        Ok(())
    }

    fn paths_by_type(&self, portal_type: &str) -> Result<Vec<String>> {
        let items = self.items.read().map_err(|_| MigrationError::StorageLocked)?;
        Ok(items
            .values()
            .filter(|item| item.portal_type() == portal_type)
            .map(|item| item.path().to_string())
            .collect())
    }

    fn len(&self) -> Result<usize> {
        let items = self.items.read().map_err(|_| MigrationError::StorageLocked)?;
        Ok(items.len())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// File-based content store (one JSON document)
///
/// Changes are made to an in-memory copy and only reach the file on
/// [`ContentStore::flush`], so a dry run simply never flushes.
#[derive(Debug)]
pub struct FileContentStore {
    path: PathBuf,
    working: InMemoryContentStore,
}

impl FileContentStore {
    /// Load the document at `path`
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let content =
            std::fs::read_to_string(&path).map_err(|e| MigrationError::ContentLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let document: ContentDocument =
            serde_json::from_str(&content).map_err(|e| MigrationError::ContentLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            "Loaded {} content objects from {}",
            document.items.len(),
            path.display()
        );

        Ok(Self {
            path,
            working: InMemoryContentStore::from_items(document.items),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentStore for FileContentStore {
    fn get(&self, path: &str) -> Result<ContentItem> {
        self.working.get(path)
    }

    fn put(&self, item: ContentItem) -> Result<()> {
        self.working.put(item)
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.working.remove(path)
    }

    fn paths_by_type(&self, portal_type: &str) -> Result<Vec<String>> {
        self.working.paths_by_type(portal_type)
    }

    fn len(&self) -> Result<usize> {
        self.working.len()
    }

    fn flush(&self) -> Result<()> {
        let document = ContentDocument {
            items: self.working.items()?,
        };
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(&self.path, json).map_err(|e| MigrationError::IoError {
            message: format!("Failed to write {}: {}", self.path.display(), e),
        })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
