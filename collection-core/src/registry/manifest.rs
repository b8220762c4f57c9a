//! Registry manifest types
//!
//! The manifest is a flat map of dotted registry keys to records, exactly as
//! the querystring registry stores them:
//!
//! ```json
//! {
//!   "namespace": "plone.app.querystring",
//!   "records": {
//!     "plone.app.querystring.field.Title": {
//!       "enabled": true,
//!       "operations": ["plone.app.querystring.operation.string.contains"]
//!     },
//!     "plone.app.querystring.operation.string.contains": {
//!       "operation": "plone.app.querystring.queryparser._contains"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Record key after the namespace: `field.<name>` or `operation.<name>`.
    /// Field names are catalog index names and may hold any character.
    static ref RECORD_KEY: Regex = Regex::new(r"^(field|operation)\.(.+)$").unwrap();
}

/// Default registry namespace
pub const DEFAULT_NAMESPACE: &str = "plone.app.querystring";

/// Module holding the standard parser functions
pub const QUERYPARSER_MODULE: &str = "plone.app.querystring.queryparser";

/// The registry manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Key prefix shared by every record
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Records by dotted key
    #[serde(default)]
    pub records: BTreeMap<String, RegistryRecord>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// A registry record: either a criterion field or an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryRecord {
    Field(FieldRecord),
    Operation(OperationRecord),
}

/// A queryable criterion field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Whether the field is offered in the query editor
    #[serde(default)]
    pub enabled: bool,

    /// Permitted operation ids
    pub operations: Vec<String>,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Editor group (e.g., "Text", "Dates")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Whether results can be sorted on this index
    #[serde(default)]
    pub sortable: bool,
}

/// A query operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Dotted name of the implementing function
    pub operation: String,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// What a record key points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Field(String),
    Operation(String),
}

impl RegistryManifest {
    /// Create a manifest builder for the given namespace
    pub fn builder(namespace: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder::new(namespace)
    }

    /// Registry key of a field record
    pub fn field_key(&self, field: &str) -> String {
        format!("{}.field.{}", self.namespace, field)
    }

    /// Registry key (and id) of an operation
    pub fn operation_id(&self, code: &str) -> String {
        format!("{}.operation.{}", self.namespace, code)
    }

    /// Split a key into its kind and name, or None if it is not in this namespace
    pub fn parse_key(&self, key: &str) -> Option<RecordKey> {
        let rest = key.strip_prefix(&self.namespace)?.strip_prefix('.')?;
        let captures = RECORD_KEY.captures(rest)?;
        let name = captures[2].to_string();
        match &captures[1] {
            "field" => Some(RecordKey::Field(name)),
            _ => Some(RecordKey::Operation(name)),
        }
    }

    /// Validate the manifest structure
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];

        if self.namespace.is_empty() {
            errors.push("namespace cannot be empty".to_string());
        }

        for (key, record) in &self.records {
            match (self.parse_key(key), record) {
                (None, _) => {
                    errors.push(format!(
                        "Key {} is not a field or operation key of namespace {}",
                        key, self.namespace
                    ));
                }
                (Some(RecordKey::Field(_)), RegistryRecord::Operation(_)) => {
                    errors.push(format!("Field key {} holds an operation record", key));
                }
                (Some(RecordKey::Operation(_)), RegistryRecord::Field(_)) => {
                    errors.push(format!("Operation key {} holds a field record", key));
                }
                (Some(RecordKey::Operation(_)), RegistryRecord::Operation(op)) => {
                    if op.operation.trim().is_empty() {
                        errors.push(format!("Operation {} has an empty callable", key));
                    }
                }
                (Some(RecordKey::Field(_)), RegistryRecord::Field(field)) => {
                    for operation in &field.operations {
                        if !matches!(self.parse_key(operation), Some(RecordKey::Operation(_))) {
                            errors.push(format!(
                                "Field {} lists {} which is not an operation id",
                                key, operation
                            ));
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The registry a stock site ships with
    ///
    /// `reference.is` is declared but its parser function does not exist, and
    /// the reference field is disabled.
    pub fn standard() -> Self {
        let mut builder = RegistryBuilder::new(DEFAULT_NAMESPACE);

        for (code, function) in STANDARD_OPERATIONS {
            builder = builder.operation(code, &format!("{}.{}", QUERYPARSER_MODULE, function));
        }

        for (field, enabled, codes) in STANDARD_FIELDS {
            builder = builder.field(field, *enabled, codes);
        }

        builder.build()
    }
}

const DATE_OPERATIONS: &[&str] = &[
    "date.lessThan",
    "date.largerThan",
    "date.between",
    "date.lessThanRelativeDate",
    "date.largerThanRelativeDate",
    "date.today",
    "date.beforeToday",
    "date.afterToday",
];

const STANDARD_OPERATIONS: &[(&str, &str)] = &[
    ("string.contains", "_contains"),
    ("string.is", "_equal"),
    ("string.currentUser", "_currentUser"),
    ("string.path", "_path"),
    ("string.relativePath", "_relativePath"),
    ("selection.is", "_equal"),
    ("reference.is", "_referenceIs"),
    ("boolean.isTrue", "_isTrue"),
    ("boolean.isFalse", "_isFalse"),
    ("int.is", "_intEqual"),
    ("int.lessThan", "_intLessThan"),
    ("int.largerThan", "_intLargerThan"),
    ("date.lessThan", "_lessThan"),
    ("date.largerThan", "_largerThan"),
    ("date.between", "_between"),
    ("date.lessThanRelativeDate", "_lessThanRelativeDate"),
    ("date.largerThanRelativeDate", "_largerThanRelativeDate"),
    ("date.today", "_today"),
    ("date.beforeToday", "_beforeToday"),
    ("date.afterToday", "_afterToday"),
];

const STANDARD_FIELDS: &[(&str, bool, &[&str])] = &[
    ("Title", true, &["string.contains", "string.is"]),
    ("Description", true, &["string.contains"]),
    ("SearchableText", true, &["string.contains"]),
    ("Subject", true, &["selection.is"]),
    ("portal_type", true, &["selection.is"]),
    ("review_state", true, &["selection.is"]),
    ("path", true, &["string.path", "string.relativePath"]),
    ("Creator", true, &["string.is", "string.currentUser"]),
    ("created", true, DATE_OPERATIONS),
    ("effective", true, DATE_OPERATIONS),
    ("expires", true, DATE_OPERATIONS),
    ("modified", true, DATE_OPERATIONS),
    ("start", true, DATE_OPERATIONS),
    ("end", true, DATE_OPERATIONS),
    ("isFolderish", true, &["boolean.isTrue", "boolean.isFalse"]),
    ("isDefaultPage", true, &["boolean.isTrue", "boolean.isFalse"]),
    ("getObjPositionInParent", true, &["int.is", "int.lessThan", "int.largerThan"]),
    ("getRawRelatedItems", false, &["reference.is"]),
];

/// Builder for RegistryManifest
#[derive(Debug)]
pub struct RegistryBuilder {
    manifest: RegistryManifest,
}

impl RegistryBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            manifest: RegistryManifest {
                namespace: namespace.into(),
                records: BTreeMap::new(),
            },
        }
    }

    /// Add a field record; `codes` are operation codes such as `string.contains`
    pub fn field(mut self, field: &str, enabled: bool, codes: &[&str]) -> Self {
        let key = self.manifest.field_key(field);
        let operations = codes
            .iter()
            .map(|code| self.manifest.operation_id(code))
            .collect();
        self.manifest.records.insert(
            key,
            RegistryRecord::Field(FieldRecord {
                enabled,
                operations,
                title: None,
                group: None,
                sortable: false,
            }),
        );
        self
    }

    /// Add an operation record backed by the dotted `callable`
    pub fn operation(mut self, code: &str, callable: &str) -> Self {
        let key = self.manifest.operation_id(code);
        self.manifest.records.insert(
            key,
            RegistryRecord::Operation(OperationRecord {
                operation: callable.to_string(),
                title: None,
            }),
        );
        self
    }

    pub fn build(self) -> RegistryManifest {
        self.manifest
    }
}
