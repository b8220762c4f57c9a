//! Normalized query rows
//!
//! A Collection stores its search as an ordered list of rows. Each row names a
//! catalog index, a dotted operation id and, for most operations, an operand:
//!
//! ```json
//! [
//!   {"i": "portal_type", "o": "plone.app.querystring.operation.selection.is", "v": ["News Item"]},
//!   {"i": "created", "o": "plone.app.querystring.operation.date.today"}
//! ]
//! ```
//!
//! The short keys match what the downstream query builder consumes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// One row of a normalized query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    /// Catalog index
    #[serde(rename = "i")]
    pub index: String,

    /// Dotted operation id
    #[serde(rename = "o")]
    pub operation: String,

    /// Operand; shape depends on the operation
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl QueryRow {
    /// Create a row without an operand
    pub fn new(index: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            operation: operation.into(),
            value: None,
        }
    }

    /// Set the operand
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Last dotted segments of the operation id after `operation.`
    ///
    /// `plone.app.querystring.operation.date.today` gives `date.today`.
    pub fn operation_code(&self) -> &str {
        match self.operation.find(".operation.") {
            Some(pos) => &self.operation[pos + ".operation.".len()..],
            None => &self.operation,
        }
    }
}

/// Ordered sequence of rows
pub type NormalizedQuery = Vec<QueryRow>;

/// SHA-256 over the canonical JSON of a query, hex encoded
///
/// Two runs that produce the same rows produce the same digest regardless of
/// map key order inside operands.
pub fn query_digest(query: &[QueryRow]) -> String {
    let mut hasher = Sha256::new();
    for row in query {
        hasher.update(row.index.as_bytes());
        hasher.update([0u8]);
        hasher.update(row.operation.as_bytes());
        hasher.update([0u8]);
        if let Some(value) = &row.value {
            hasher.update(canonical_json(value).as_bytes());
        }
        hasher.update([0xffu8]);
    }
    hex::encode(hasher.finalize())
}

/// Canonical JSON serialization (sorted keys)
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| *k);
            let contents: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}:{}", Value::String((*k).clone()), canonical_json(v)))
                .collect();
            format!("{{{}}}", contents.join(","))
        }
        Value::Array(arr) => {
            let contents: Vec<String> = arr.iter().map(canonical_json).collect();
            format!("[{}]", contents.join(","))
        }
        _ => value.to_string(),
    }
}
