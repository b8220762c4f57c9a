//! Topic to Collection migration
//!
//! Per Topic, in order:
//!
//! 1. Collect: convert every criterion into a [`MigrationContext`]. Sort
//!    criteria only set the sort index and direction. Any fatal error stops
//!    here, before anything is written.
//! 2. Copy properties onto a fresh Collection.
//! 3. Commit the context: limit, sort and query, each only if the Topic had it.
//! 4. Migrate the layout. This must come last, since it is a property write
//!    that step 2 would otherwise overwrite.

use crate::config::MigrationConfig;
use crate::content::{CollectionObject, ContentItem, TopicObject, TOPIC_TYPE};
use crate::convert::{ConversionContext, ConverterTable};
use crate::diagnostics::Diagnostics;
use crate::error::{MigrationError, Result};
use crate::query::NormalizedQuery;
use crate::registry::QuerystringRegistry;
use crate::timing::Clock;

use super::report::MigrationKind;
use super::walker::Migrator;

/// What the criteria pass captured for one Topic
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationContext {
    pub sort_on: Option<String>,
    pub sort_reversed: Option<bool>,
    pub query: Option<NormalizedQuery>,
}

/// Migrates Topics into Collections
pub struct TopicMigrator<'a> {
    registry: &'a QuerystringRegistry,
    config: &'a MigrationConfig,
    clock: &'a dyn Clock,
    table: ConverterTable,
}

impl<'a> TopicMigrator<'a> {
    pub fn new(
        registry: &'a QuerystringRegistry,
        config: &'a MigrationConfig,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            registry,
            config,
            clock,
            table: ConverterTable::standard(),
        }
    }

    /// Migrate one Topic
    pub fn migrate_topic(
        &self,
        topic: &TopicObject,
        diag: &mut Diagnostics,
    ) -> Result<CollectionObject> {
        tracing::info!("Migrating Topic at {}", topic.path);

        let context = self.collect_criteria(topic, diag)?;
        let mut collection = self.copy_properties(topic);
        self.commit_criteria(topic, context, &mut collection);
        self.migrate_layout(topic, &mut collection);

        Ok(collection)
    }

    /// Convert the Topic's criteria
    pub fn collect_criteria(
        &self,
        topic: &TopicObject,
        diag: &mut Diagnostics,
    ) -> Result<MigrationContext> {
        tracing::debug!(
            "Old criteria for {}: {:?}",
            topic.path,
            topic
                .criteria
                .iter()
                .map(|c| (&c.criterion_type, &c.items))
                .collect::<Vec<_>>()
        );

        let mut context = MigrationContext::default();
        let mut rows = NormalizedQuery::new();
        let mut ctx = ConversionContext::new(self.registry, self.clock, diag).with_type_names(
            &self.config.legacy_type_name,
            &self.config.replacement_type_name,
        );

        for criterion in &topic.criteria {
            if criterion.is_sort() {
                context.sort_on = Some(criterion.field.clone());
                context.sort_reversed = Some(criterion.reversed);
                tracing::debug!(
                    "Sort on {:?}, reverse: {}.",
                    criterion.field,
                    criterion.reversed
                );
                continue;
            }
            self.table.convert(&mut rows, criterion, &mut ctx)?;
        }

        tracing::debug!("New query for {}: {:?}", topic.path, rows);
        context.query = Some(rows);
        Ok(context)
    }

    /// A fresh Collection carrying the Topic's metadata and default layout
    pub fn copy_properties(&self, topic: &TopicObject) -> CollectionObject {
        CollectionObject::new(topic.path.clone(), topic.metadata.clone())
    }

    /// Write the captured settings; anything not captured keeps its default
    pub fn commit_criteria(
        &self,
        topic: &TopicObject,
        context: MigrationContext,
        collection: &mut CollectionObject,
    ) {
        if topic.limit_number {
            collection.set_limit(topic.item_count);
        }
        if let Some(reversed) = context.sort_reversed {
            collection.set_sort_reversed(reversed);
        }
        if let Some(sort_on) = context.sort_on {
            collection.set_sort_on(sort_on);
        }
        if let Some(query) = context.query {
            collection.set_query(query);
        }
    }

    /// Map the view method; the custom view flag forces the tabular layout
    pub fn migrate_layout(&self, topic: &TopicObject, collection: &mut CollectionObject) {
        if topic.custom_view {
            collection.set_layout(self.config.tabular_layout.as_str());
            return;
        }
        if let Some(layout) = topic
            .layout
            .as_deref()
            .and_then(|legacy| self.config.map_layout(legacy))
        {
            collection.set_layout(layout);
        }
    }
}

impl Migrator for TopicMigrator<'_> {
    fn kind(&self) -> MigrationKind {
        MigrationKind::Topics
    }

    fn src_portal_type(&self) -> &str {
        TOPIC_TYPE
    }

    fn migrate(&self, item: ContentItem, diag: &mut Diagnostics) -> Result<ContentItem> {
        match item {
            ContentItem::Topic(topic) => Ok(self.migrate_topic(&topic, diag)?.into()),
            other => Err(MigrationError::UnexpectedContentType {
                path: other.path().to_string(),
                expected: TOPIC_TYPE.to_string(),
                actual: other.portal_type().to_string(),
            }),
        }
    }
}
