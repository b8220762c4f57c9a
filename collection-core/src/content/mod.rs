//! Content objects
//!
//! The content tree holds two kinds of object this crate cares about:
//!
//! - [`TopicObject`]: the legacy query object, built from typed criteria
//! - [`CollectionObject`]: its replacement, holding a normalized query
//!
//! Both are stored as [`ContentItem`]s, tagged by `type` in JSON.

mod collection;
mod topic;

pub use collection::{
    CollectionObject, QueryOptions, QueryRequest, SortOrder, DEFAULT_ITEM_COUNT, DEFAULT_LAYOUT,
    DEFAULT_LIMIT,
};
pub use topic::TopicObject;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Portal type of legacy Topics
pub const TOPIC_TYPE: &str = "Topic";

/// Portal type of Collections
pub const COLLECTION_TYPE: &str = "Collection";

/// Descriptive properties shared by every content object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Object id, the last path segment
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<DateTime<FixedOffset>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    /// Any other stored property, carried over untouched
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Metadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// An object in the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Topic(TopicObject),
    Collection(CollectionObject),
}

impl ContentItem {
    /// Path of the object in the tree
    pub fn path(&self) -> &str {
        match self {
            ContentItem::Topic(topic) => &topic.path,
            ContentItem::Collection(collection) => &collection.path,
        }
    }

    /// Portal type name
    pub fn portal_type(&self) -> &'static str {
        match self {
            ContentItem::Topic(_) => TOPIC_TYPE,
            ContentItem::Collection(_) => COLLECTION_TYPE,
        }
    }

    /// Whether the object can contain children
    ///
    /// Topics were always containers (they could hold sub-topics).
    pub fn is_folderish(&self) -> bool {
        match self {
            ContentItem::Topic(_) => true,
            ContentItem::Collection(collection) => collection.folderish,
        }
    }
}

impl From<TopicObject> for ContentItem {
    fn from(topic: TopicObject) -> Self {
        ContentItem::Topic(topic)
    }
}

impl From<CollectionObject> for ContentItem {
    fn from(collection: CollectionObject) -> Self {
        ContentItem::Collection(collection)
    }
}
