//! Registry lookup adapter
//!
//! Answers the four questions the converters ask about a field: is it a
//! criterion index, is it enabled, which operations does it permit, and does
//! a given operation resolve to an installed implementation.

use std::collections::{BTreeSet, HashMap};

use crate::diagnostics::{codes, Diagnostics};
use crate::error::{MigrationError, Result};

use super::catalog::OperationCatalog;
use super::manifest::{RecordKey, RegistryManifest, RegistryRecord};

/// A criterion field as loaded
#[derive(Debug, Clone)]
struct FieldEntry {
    enabled: bool,
    operations: BTreeSet<String>,
}

/// An operation as loaded, with its resolution settled at load time
#[derive(Debug, Clone)]
pub struct OperationEntry {
    /// Dotted callable name
    pub callable: String,
    /// Whether the callable is in the catalog
    pub resolved: bool,
}

/// Read-only view of the querystring registry
#[derive(Debug, Clone)]
pub struct QuerystringRegistry {
    namespace: String,

    /// Field records by registry key
    fields: HashMap<String, FieldEntry>,

    /// Operation records by operation id
    operations: HashMap<String, OperationEntry>,
}

impl QuerystringRegistry {
    /// Build the registry, resolving every operation against `catalog`
    pub fn load(manifest: &RegistryManifest, catalog: &OperationCatalog) -> Result<Self> {
        manifest
            .validate()
            .map_err(|errors| MigrationError::InvalidRegistry {
                reason: errors.join("; "),
            })?;

        let mut fields = HashMap::new();
        let mut operations = HashMap::new();

        for (key, record) in &manifest.records {
            match (manifest.parse_key(key), record) {
                (Some(RecordKey::Field(_)), RegistryRecord::Field(field)) => {
                    fields.insert(
                        key.clone(),
                        FieldEntry {
                            enabled: field.enabled,
                            operations: field.operations.iter().cloned().collect(),
                        },
                    );
                }
                (Some(RecordKey::Operation(_)), RegistryRecord::Operation(op)) => {
                    let resolved = catalog.resolves(&op.operation);
                    if !resolved {
                        tracing::debug!(
                            "Operation {} is backed by {}, which is not installed",
                            key,
                            op.operation
                        );
                    }
                    operations.insert(
                        key.clone(),
                        OperationEntry {
                            callable: op.operation.clone(),
                            resolved,
                        },
                    );
                }
                // validate() has already rejected everything else
                _ => {}
            }
        }

        tracing::debug!(
            "Loaded registry {}: {} fields, {} operations",
            manifest.namespace,
            fields.len(),
            operations.len()
        );

        Ok(Self {
            namespace: manifest.namespace.clone(),
            fields,
            operations,
        })
    }

    /// The standard registry resolved against the standard catalog
    pub fn standard() -> Result<Self> {
        Self::load(&RegistryManifest::standard(), &OperationCatalog::standard())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key of a field record
    pub fn field_key(&self, field: &str) -> String {
        format!("{}.field.{}", self.namespace, field)
    }

    /// Operation id for an operation code such as `string.contains`
    pub fn operation_id(&self, code: &str) -> String {
        format!("{}.operation.{}", self.namespace, code)
    }

    /// Is the field registered as a criterion index?
    pub fn is_field_known(&self, field: &str, diag: &mut Diagnostics) -> bool {
        let key = self.field_key(field);
        if self.fields.contains_key(&key) {
            return true;
        }
        diag.error(
            codes::UNKNOWN_FIELD,
            field,
            format!(
                "Index {} is no criterion index. Registry has no key {}",
                field, key
            ),
        );
        false
    }

    /// Is the field enabled as a criterion index?
    ///
    /// Callers proceed either way; a disabled field only gets a warning.
    pub fn is_field_enabled(&self, field: &str, diag: &mut Diagnostics) -> bool {
        let enabled = self
            .fields
            .get(&self.field_key(field))
            .map(|f| f.enabled)
            .unwrap_or(false);
        if !enabled {
            diag.warn(
                codes::FIELD_DISABLED,
                field,
                format!("Index {} is not enabled as criterion index", field),
            );
        }
        enabled
    }

    /// Operation ids the field permits
    pub fn permitted_operations(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.fields
            .get(&self.field_key(field))
            .map(|f| &f.operations)
    }

    /// Is the operation defined and backed by an installed implementation?
    pub fn resolve_operation_impl(&self, operation: &str, diag: &mut Diagnostics) -> bool {
        match self.operations.get(operation) {
            None => {
                diag.error(
                    codes::UNDEFINED_OPERATION,
                    operation,
                    format!("Operation {} is not defined", operation),
                );
                false
            }
            Some(entry) if !entry.resolved => {
                diag.error(
                    codes::UNRESOLVABLE_OPERATION,
                    operation,
                    format!(
                        "Cannot resolve implementation for operation {}: {}",
                        operation, entry.callable
                    ),
                );
                false
            }
            Some(_) => true,
        }
    }

    /// `candidate` if it is permitted for the field and resolvable
    pub fn valid_operation(
        &self,
        field: &str,
        candidate: &str,
        diag: &mut Diagnostics,
    ) -> Option<String> {
        let permitted = self
            .permitted_operations(field)
            .is_some_and(|ops| ops.contains(candidate));
        if !permitted {
            return None;
        }
        if self.resolve_operation_impl(candidate, diag) {
            Some(candidate.to_string())
        } else {
            None
        }
    }

    /// Loaded operation entry by id
    pub fn operation(&self, operation: &str) -> Option<&OperationEntry> {
        self.operations.get(operation)
    }
}
