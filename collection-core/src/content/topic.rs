//! Legacy Topic

use serde::{Deserialize, Serialize};

use crate::criteria::LegacyCriterion;

use super::Metadata;

/// A legacy query object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicObject {
    /// Path in the content tree
    pub path: String,

    #[serde(flatten)]
    pub metadata: Metadata,

    /// Criteria in the order they were added
    #[serde(default)]
    pub criteria: Vec<LegacyCriterion>,

    /// Whether `item_count` limits the result set
    #[serde(default)]
    pub limit_number: bool,

    /// Number of items to show
    #[serde(default)]
    pub item_count: u32,

    /// Show results as a table of selected fields
    #[serde(default)]
    pub custom_view: bool,

    /// Selected view method, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl TopicObject {
    pub fn new(path: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata,
            criteria: Vec::new(),
            limit_number: false,
            item_count: 0,
            custom_view: false,
            layout: None,
        }
    }

    pub fn with_criterion(mut self, criterion: LegacyCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Enable the result limit
    pub fn with_limit(mut self, item_count: u32) -> Self {
        self.limit_number = true;
        self.item_count = item_count;
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_custom_view(mut self, custom_view: bool) -> Self {
        self.custom_view = custom_view;
        self
    }
}
