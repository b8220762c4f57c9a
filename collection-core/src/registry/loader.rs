//! Registry Loader
//!
//! Loads registry manifests and operation catalogs from:
//! - JSON files
//! - In-memory JSON strings

use std::fs;
use std::path::Path;

use crate::error::{MigrationError, Result};

use super::catalog::OperationCatalog;
use super::lookup::QuerystringRegistry;
use super::manifest::RegistryManifest;

/// Loader for registry manifests and catalogs
#[derive(Debug)]
pub struct RegistryLoader {
    /// Whether to validate on load
    validate_on_load: bool,
}

impl RegistryLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            validate_on_load: true,
        }
    }

    /// Disable validation on load
    ///
    /// [`QuerystringRegistry::load`] still validates; this only defers the
    /// error to that point.
    pub fn skip_validation(mut self) -> Self {
        self.validate_on_load = false;
        self
    }

    /// Load a manifest from a JSON string
    pub fn load_from_json(&self, json: &str) -> Result<RegistryManifest> {
        let manifest: RegistryManifest =
            serde_json::from_str(json).map_err(|e| MigrationError::InvalidRegistry {
                reason: e.to_string(),
            })?;
        self.check(manifest)
    }

    /// Load a manifest from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<RegistryManifest> {
        let path = path.as_ref();
        let content = read(path)?;
        let manifest: RegistryManifest =
            serde_json::from_str(&content).map_err(|e| MigrationError::InvalidRegistry {
                reason: format!("{}: {}", path.display(), e),
            })?;
        self.check(manifest)
    }

    /// Load an operation catalog from a JSON file
    pub fn load_catalog_from_file<P: AsRef<Path>>(&self, path: P) -> Result<OperationCatalog> {
        let path = path.as_ref();
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|e| MigrationError::InvalidRegistry {
            reason: format!("{}: {}", path.display(), e),
        })
    }

    /// Load a manifest file and resolve it against `catalog`
    pub fn load_registry<P: AsRef<Path>>(
        &self,
        path: P,
        catalog: &OperationCatalog,
    ) -> Result<QuerystringRegistry> {
        let manifest = self.load_from_file(path)?;
        QuerystringRegistry::load(&manifest, catalog)
    }

    fn check(&self, manifest: RegistryManifest) -> Result<RegistryManifest> {
        if self.validate_on_load {
            manifest
                .validate()
                .map_err(|errors| MigrationError::InvalidRegistry {
                    reason: errors.join("; "),
                })?;
        }
        Ok(manifest)
    }
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MigrationError::RegistryLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_json() {
        let loader = RegistryLoader::new();
        let manifest = loader
            .load_from_json(
                r#"{
                    "namespace": "plone.app.querystring",
                    "records": {
                        "plone.app.querystring.field.Title": {
                            "enabled": true,
                            "operations": ["plone.app.querystring.operation.string.contains"]
                        }
                    }
                }"#,
            )
            .unwrap();
        assert_eq!(manifest.records.len(), 1);
    }

    #[test]
    fn test_load_rejects_bad_key() {
        let loader = RegistryLoader::new();
        let err = loader
            .load_from_json(r#"{"records": {"nope": {"operation": "a.b"}}}"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REGISTRY");

        let manifest = loader
            .skip_validation()
            .load_from_json(r#"{"records": {"nope": {"operation": "a.b"}}}"#)
            .unwrap();
        assert_eq!(manifest.records.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryLoader::new()
            .load_from_file("/nonexistent/registry.json")
            .unwrap_err();
        assert_eq!(err.error_code(), "REGISTRY_LOAD_ERROR");
    }

    #[test]
    fn test_load_registry_from_file() {
        let dir = std::env::temp_dir().join("collection-test-registry");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("registry.json");
        let json = serde_json::to_string_pretty(&RegistryManifest::standard()).unwrap();
        std::fs::write(&path, json).unwrap();

        let registry = RegistryLoader::new()
            .load_registry(&path, &OperationCatalog::standard())
            .unwrap();
        assert_eq!(registry.namespace(), "plone.app.querystring");

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }
}
