//! Batch walker
//!
//! Walks every object of the migrator's source type, in the store's catalog
//! order, and writes each migrated object back at the same path. The first
//! error stops the walk: a half-migrated tree cannot be verified, so the
//! caller must fix the cause and run again.

use crate::content::ContentItem;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::query::{query_digest, QueryRow};
use crate::storage::ContentStore;

use super::report::{MigrationKind, MigrationReport, ObjectReport};

/// One kind of in-place object migration
pub trait Migrator {
    /// Report kind
    fn kind(&self) -> MigrationKind;

    /// Portal type the walker queries for
    fn src_portal_type(&self) -> &str;

    /// Whether `item` still needs migrating
    fn should_migrate(&self, _item: &ContentItem) -> bool {
        true
    }

    /// Produce the replacement object
    fn migrate(&self, item: ContentItem, diag: &mut Diagnostics) -> Result<ContentItem>;
}

/// Walker over a content store
pub struct MigrationWalker<'s> {
    store: &'s dyn ContentStore,
}

impl<'s> MigrationWalker<'s> {
    pub fn new(store: &'s dyn ContentStore) -> Self {
        Self { store }
    }

    /// Migrate every candidate object
    ///
    /// Nothing is flushed; the caller decides whether to persist.
    pub fn go<M: Migrator + ?Sized>(&self, migrator: &M) -> Result<MigrationReport> {
        let mut report = MigrationReport::begin(migrator.kind());
        let paths = self.store.paths_by_type(migrator.src_portal_type())?;

        tracing::info!(
            "Starting {} migration {} over {} {} objects in {} store",
            report.kind,
            report.run_id,
            paths.len(),
            migrator.src_portal_type(),
            self.store.name()
        );

        for path in paths {
            let item = self.store.get(&path)?;
            if !migrator.should_migrate(&item) {
                tracing::debug!("Skipping {}: already migrated", path);
                report.skipped.push(path);
                continue;
            }

            let mut diag = Diagnostics::new();
            let migrated = migrator.migrate(item, &mut diag).map_err(|e| {
                tracing::error!("Migration of {} failed: {}", path, e);
                e
            })?;

            report.migrated.push(object_report(&path, &migrated, diag));
            self.store.put(migrated)?;
        }

        let report = report.finish();
        tracing::info!("{}", report.summary());
        Ok(report)
    }
}

fn object_report(path: &str, item: &ContentItem, diag: Diagnostics) -> ObjectReport {
    let query: &[QueryRow] = match item {
        ContentItem::Collection(collection) => collection.query.as_slice(),
        ContentItem::Topic(_) => &[],
    };
    ObjectReport {
        path: path.to_string(),
        portal_type: item.portal_type().to_string(),
        rows: query.len(),
        query_digest: query_digest(query),
        diagnostics: diag.entries().to_vec(),
    }
}
