//! Installed operation implementations
//!
//! The registry declares which dotted callable backs each operation. Whether
//! that callable actually exists depends on what is deployed. The catalog is
//! the list of what is deployed; an operation whose callable is missing here
//! cannot be used, even if the registry permits it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::manifest::QUERYPARSER_MODULE;

/// Parser functions shipped with a stock query parser
///
/// There is no `_referenceIs`: the reference operation has never had an
/// implementation.
const STANDARD_FUNCTIONS: &[&str] = &[
    "_contains",
    "_equal",
    "_currentUser",
    "_path",
    "_relativePath",
    "_isTrue",
    "_isFalse",
    "_intEqual",
    "_intLessThan",
    "_intLargerThan",
    "_lessThan",
    "_largerThan",
    "_between",
    "_lessThanRelativeDate",
    "_largerThanRelativeDate",
    "_today",
    "_beforeToday",
    "_afterToday",
];

/// Set of resolvable dotted callable names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCatalog {
    #[serde(default)]
    implementations: BTreeSet<String>,
}

impl OperationCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock query parser's functions
    pub fn standard() -> Self {
        STANDARD_FUNCTIONS
            .iter()
            .map(|f| format!("{}.{}", QUERYPARSER_MODULE, f))
            .collect()
    }

    /// Register an implementation
    pub fn with_implementation(mut self, callable: impl Into<String>) -> Self {
        self.implementations.insert(callable.into());
        self
    }

    /// Remove an implementation (simulates a version mismatch)
    pub fn without_implementation(mut self, callable: &str) -> Self {
        self.implementations.remove(callable);
        self
    }

    /// Whether `callable` resolves
    pub fn resolves(&self, callable: &str) -> bool {
        self.implementations.contains(callable)
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }
}

impl FromIterator<String> for OperationCatalog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            implementations: iter.into_iter().collect(),
        }
    }
}
