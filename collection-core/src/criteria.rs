//! Legacy Topic criteria
//!
//! A Topic stores its search as a list of typed criterion objects. Each one
//! exposes the (index, value) pairs it would contribute to a catalog query,
//! plus a few accessors specific to its type. Values keep their legacy
//! shapes, so they are carried as JSON:
//!
//! | Type | Item value |
//! |---|---|
//! | `ATSimpleStringCriterion` | `"text"` |
//! | `ATSelectionCriterion`, `ATListCriterion`, `ATReferenceCriterion` | `{"query": [...], "operator": "or"}` |
//! | `ATPortalTypeCriterion` | `["Document", "Topic"]` |
//! | `ATPathCriterion` | `{"query": [...], "depth": -1}` |
//! | `ATBooleanCriterion` | `[1, true, "1", "True"]` |
//! | `ATSimpleIntCriterion` | `{"query": 5, "range": "min"}` |
//! | `ATDateRangeCriterion` | `{"query": [start, end], "range": "min:max"}` |

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Legacy criterion type names
pub mod types {
    pub const BOOLEAN: &str = "ATBooleanCriterion";
    pub const CURRENT_AUTHOR: &str = "ATCurrentAuthorCriterion";
    pub const DATE: &str = "ATDateCriteria";
    pub const DATE_RANGE: &str = "ATDateRangeCriterion";
    pub const LIST: &str = "ATListCriterion";
    pub const PATH: &str = "ATPathCriterion";
    pub const PORTAL_TYPE: &str = "ATPortalTypeCriterion";
    pub const REFERENCE: &str = "ATReferenceCriterion";
    pub const RELATIVE_PATH: &str = "ATRelativePathCriterion";
    pub const SELECTION: &str = "ATSelectionCriterion";
    pub const SIMPLE_INT: &str = "ATSimpleIntCriterion";
    pub const SIMPLE_STRING: &str = "ATSimpleStringCriterion";
    pub const SORT: &str = "ATSortCriterion";
}

/// One (index, value) pair a criterion contributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionItem {
    pub index: String,
    pub value: Value,
}

/// A legacy criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyCriterion {
    /// Source type name, the dispatch key
    #[serde(rename = "type")]
    pub criterion_type: String,

    /// Field (catalog index) the criterion is bound to
    pub field: String,

    /// Catalog query items
    #[serde(default)]
    pub items: Vec<CriterionItem>,

    /// Path criteria: search subfolders too
    #[serde(default)]
    pub recurse: bool,

    /// Path criteria: the stored paths or UIDs
    #[serde(default)]
    pub raw_value: Vec<String>,

    /// Relative path criteria: the path relative to the Topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,

    /// Date criteria: offset in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    /// Date criteria: `within_day`, `more` or `less`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Date criteria: `+` for the future, `-` for the past
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,

    /// Sort criteria: reverse order
    #[serde(default)]
    pub reversed: bool,
}

impl LegacyCriterion {
    /// Create a criterion with no items
    pub fn new(criterion_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            criterion_type: criterion_type.into(),
            field: field.into(),
            items: Vec::new(),
            recurse: false,
            raw_value: Vec::new(),
            relative_path: None,
            value: None,
            operation: None,
            date_range: None,
            reversed: false,
        }
    }

    /// Add a query item on the criterion's own field
    pub fn with_value(self, value: Value) -> Self {
        let index = self.field.clone();
        self.with_item(index, value)
    }

    /// Add a query item
    pub fn with_item(mut self, index: impl Into<String>, value: Value) -> Self {
        self.items.push(CriterionItem {
            index: index.into(),
            value,
        });
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_raw_value(mut self, raw: Vec<String>) -> Self {
        self.raw_value = raw;
        self
    }

    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    /// Date criteria: operation, offset in days and direction
    pub fn with_date(mut self, operation: &str, offset: i64, date_range: &str) -> Self {
        self.operation = Some(operation.to_string());
        self.value = Some(offset);
        self.date_range = Some(date_range.to_string());
        self
    }

    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Whether this criterion only carries sort information
    pub fn is_sort(&self) -> bool {
        self.criterion_type == types::SORT
    }

    /// Whether the date offset points into the past
    pub fn is_past(&self) -> bool {
        self.date_range.as_deref() == Some("-")
    }
}
