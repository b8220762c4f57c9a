//! # Collection Core - Topic to Collection migration
//!
//! A Collection is a content object that stores its search as a *normalized
//! query*: an ordered list of `{index, operation, value}` rows checked against
//! the site's querystring registry. This crate provides:
//!
//! - **Collection**: the content type, its defaults and the request it hands
//!   to the query builder
//! - **Converters**: one per legacy Topic criterion type, turning typed
//!   criteria into normalized query rows
//! - **Migrations**: batch walks that replace Topics with Collections and make
//!   leaf Collections folderish
//!
//! ## Core Principle
//!
//! > A row is only written if the registry says its index and operation exist.
//!
//! Anything else is dropped and recorded. Only an unknown criterion type or an
//! unconvertible date filter stops the run.
//!
//! ## Example
//!
//! ```rust
//! use collection_core::content::{ContentItem, Metadata, TopicObject};
//! use collection_core::criteria::{types, LegacyCriterion};
//! use collection_core::storage::{ContentStore, InMemoryContentStore};
//! use collection_core::timing::SystemClock;
//! use collection_core::{migrate_topics, MigrationConfig, QuerystringRegistry};
//! use serde_json::json;
//!
//! let topic = TopicObject::new("/plone/news", Metadata::new("news"))
//!     .with_criterion(
//!         LegacyCriterion::new(types::PORTAL_TYPE, "portal_type")
//!             .with_value(json!(["News Item", "Topic"])),
//!     )
//!     .with_criterion(LegacyCriterion::new(types::SORT, "effective").with_reversed(true));
//!
//! let store = InMemoryContentStore::from_items([ContentItem::from(topic)]);
//! let registry = QuerystringRegistry::standard().unwrap();
//! let report = migrate_topics(
//!     &store,
//!     &registry,
//!     &MigrationConfig::default(),
//!     &SystemClock::new(),
//! )
//! .unwrap();
//! assert_eq!(report.migrated.len(), 1);
//!
//! match store.get("/plone/news").unwrap() {
//!     ContentItem::Collection(collection) => {
//!         assert_eq!(collection.sort_on.as_deref(), Some("effective"));
//!         assert_eq!(collection.query[0].value, Some(json!(["News Item", "Collection"])));
//!     }
//!     other => panic!("not migrated: {:?}", other),
//! }
//! ```

pub mod config;
pub mod content;
pub mod convert;
pub mod criteria;
pub mod diagnostics;
pub mod error;
pub mod migrate;
pub mod query;
pub mod registry;
pub mod storage;
pub mod timing;

// Re-export main types
pub use config::MigrationConfig;
pub use content::{CollectionObject, ContentItem, Metadata, QueryOptions, QueryRequest, TopicObject};
pub use convert::{ConversionContext, ConverterTable, CriterionConverter, Operand};
pub use criteria::{CriterionItem, LegacyCriterion};
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use error::{ErrorCategory, ErrorDetail, ErrorResponse, MigrationError, Result};
pub use migrate::{
    migrate_to_folderish_collections, migrate_topics, FolderishMigrator, MigrationReport,
    TopicMigrator,
};
pub use query::{query_digest, NormalizedQuery, QueryRow};
pub use registry::{OperationCatalog, QuerystringRegistry, RegistryLoader, RegistryManifest};
pub use storage::{ContentStore, FileContentStore, InMemoryContentStore};
pub use timing::{Clock, FixedClock, SystemClock};
