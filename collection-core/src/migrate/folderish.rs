//! Folderish Collection migration
//!
//! Old and new Collections share one portal type, so a catalog query alone
//! would hand already-migrated objects to the migrator again. The pre-check
//! skips anything that is already a container.

use crate::content::{ContentItem, COLLECTION_TYPE};
use crate::diagnostics::Diagnostics;
use crate::error::{MigrationError, Result};

use super::report::MigrationKind;
use super::walker::Migrator;

/// Is this a Collection that has not been made folderish yet?
pub fn is_old_non_folderish_item(item: &ContentItem) -> bool {
    !item.is_folderish()
}

/// Turns leaf Collections into containers
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderishMigrator;

impl FolderishMigrator {
    pub fn new() -> Self {
        Self
    }
}

impl Migrator for FolderishMigrator {
    fn kind(&self) -> MigrationKind {
        MigrationKind::FolderishCollections
    }

    fn src_portal_type(&self) -> &str {
        COLLECTION_TYPE
    }

    fn should_migrate(&self, item: &ContentItem) -> bool {
        is_old_non_folderish_item(item)
    }

    fn migrate(&self, item: ContentItem, _diag: &mut Diagnostics) -> Result<ContentItem> {
        match item {
            ContentItem::Collection(mut collection) => {
                tracing::info!("Making Collection at {} folderish", collection.path);
                collection.folderish = true;
                Ok(collection.into())
            }
            other => Err(MigrationError::UnexpectedContentType {
                path: other.path().to_string(),
                expected: COLLECTION_TYPE.to_string(),
                actual: other.portal_type().to_string(),
            }),
        }
    }
}
