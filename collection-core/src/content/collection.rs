//! Collection content type
//!
//! A Collection stores a normalized query plus the presentation settings the
//! query builder needs: sort index, sort direction, a hard result limit and a
//! page size. Running the query is left to the query builder;
//! [`CollectionObject::query_request`] only assembles its arguments.

use serde::{Deserialize, Serialize};

use crate::query::NormalizedQuery;

use super::Metadata;

/// Default hard limit on results
pub const DEFAULT_LIMIT: u32 = 1000;

/// Default page size
pub const DEFAULT_ITEM_COUNT: u32 = 30;

/// Default view method
pub const DEFAULT_LAYOUT: &str = "standard_view";

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_item_count() -> u32 {
    DEFAULT_ITEM_COUNT
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

/// A Collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionObject {
    /// Path in the content tree
    pub path: String,

    #[serde(flatten)]
    pub metadata: Metadata,

    /// Whether the Collection can contain children
    #[serde(default)]
    pub folderish: bool,

    #[serde(default)]
    pub query: NormalizedQuery,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_on: Option<String>,

    #[serde(default)]
    pub sort_reversed: bool,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_item_count")]
    pub item_count: u32,

    #[serde(default = "default_layout")]
    pub layout: String,
}

impl CollectionObject {
    /// A new, non-folderish Collection with default settings
    pub fn new(path: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata,
            folderish: false,
            query: NormalizedQuery::new(),
            sort_on: None,
            sort_reversed: false,
            limit: DEFAULT_LIMIT,
            item_count: DEFAULT_ITEM_COUNT,
            layout: default_layout(),
        }
    }

    pub fn set_query(&mut self, query: NormalizedQuery) {
        self.query = query;
    }

    pub fn set_sort_on(&mut self, sort_on: impl Into<String>) {
        self.sort_on = Some(sort_on.into());
    }

    pub fn set_sort_reversed(&mut self, reversed: bool) {
        self.sort_reversed = reversed;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    pub fn set_layout(&mut self, layout: impl Into<String>) {
        self.layout = layout.into();
    }

    /// Build the query builder arguments
    ///
    /// Explicit options win. Otherwise the page size falls back to
    /// `item_count`, the sort index to `sort_on` and the limit to `limit`.
    /// Zero counts as unset on both sides.
    pub fn query_request(&self, options: QueryOptions) -> QueryRequest {
        let b_size = options
            .b_size
            .filter(|size| *size > 0)
            .or_else(|| non_zero(self.item_count));
        let sort_on = options.sort_on.or_else(|| self.sort_on.clone());
        let limit = options
            .limit
            .filter(|limit| *limit > 0)
            .or_else(|| non_zero(self.limit));

        QueryRequest {
            query: self.query.clone(),
            batch: options.batch,
            b_start: options.b_start,
            b_size,
            sort_on,
            sort_order: if self.sort_reversed {
                SortOrder::Reverse
            } else {
                SortOrder::Ascending
            },
            limit,
        }
    }
}

fn non_zero(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}

/// Caller-supplied query options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub batch: bool,
    pub b_start: u32,
    pub b_size: Option<u32>,
    pub sort_on: Option<String>,
    pub limit: Option<u32>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            batch: true,
            b_start: 0,
            b_size: None,
            sort_on: None,
            limit: None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Reverse,
}

/// Arguments handed to the query builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: NormalizedQuery,
    pub batch: bool,
    pub b_start: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_on: Option<String>,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
