//! Batch migrations
//!
//! Two entry points, both safe to run again on an already-migrated tree:
//!
//! - [`migrate_topics`]: replace every Topic with an equivalent Collection
//! - [`migrate_to_folderish_collections`]: make every leaf Collection a container

mod folderish;
mod report;
mod topic;
mod walker;

pub use folderish::{is_old_non_folderish_item, FolderishMigrator};
pub use report::{MigrationKind, MigrationReport, ObjectReport};
pub use topic::{MigrationContext, TopicMigrator};
pub use walker::{MigrationWalker, Migrator};

use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use crate::registry::QuerystringRegistry;
use crate::storage::ContentStore;
use crate::timing::Clock;

/// Migrate every Topic in `store` to a Collection
///
/// The store is not flushed.
pub fn migrate_topics(
    store: &dyn ContentStore,
    registry: &QuerystringRegistry,
    config: &MigrationConfig,
    clock: &dyn Clock,
) -> Result<MigrationReport> {
    config.validate()?;
    if config.namespace != registry.namespace() {
        return Err(MigrationError::InvalidConfig {
            reason: format!(
                "configured namespace {} does not match registry namespace {}",
                config.namespace,
                registry.namespace()
            ),
        });
    }

    tracing::debug!("Using {} clock", clock.name());
    let migrator = TopicMigrator::new(registry, config, clock);
    MigrationWalker::new(store).go(&migrator)
}

/// Make every non-folderish Collection in `store` folderish
///
/// The store is not flushed.
pub fn migrate_to_folderish_collections(store: &dyn ContentStore) -> Result<MigrationReport> {
    MigrationWalker::new(store).go(&FolderishMigrator::new())
}
