//! Configuration for the Topic migration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, Result};
use crate::registry::DEFAULT_NAMESPACE;

/// Main migration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Registry namespace the query rows are written against
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Type name replaced in selection values
    #[serde(default = "default_legacy_type")]
    pub legacy_type_name: String,

    /// Type name substituted for `legacy_type_name`
    #[serde(default = "default_replacement_type")]
    pub replacement_type_name: String,

    /// Layout forced when the Topic used the custom (tabular) view
    #[serde(default = "default_tabular_layout")]
    pub tabular_layout: String,

    /// Legacy view method to new view method
    #[serde(default = "default_layouts")]
    pub layouts: BTreeMap<String, String>,
}

fn default_namespace() -> String { DEFAULT_NAMESPACE.to_string() }
fn default_legacy_type() -> String { "Topic".to_string() }
fn default_replacement_type() -> String { "Collection".to_string() }
fn default_tabular_layout() -> String { "tabular_view".to_string() }

fn default_layouts() -> BTreeMap<String, String> {
    [
        ("folder_listing", "standard_view"),
        ("folder_summary_view", "summary_view"),
        ("folder_full_view", "all_content"),
        ("folder_tabular_view", "tabular_view"),
        ("atct_album_view", "thumbnail_view"),
        ("atct_topic_view", "standard_view"),
    ]
    .into_iter()
    .map(|(old, new)| (old.to_string(), new.to_string()))
    .collect()
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            legacy_type_name: default_legacy_type(),
            replacement_type_name: default_replacement_type(),
            tabular_layout: default_tabular_layout(),
            layouts: default_layouts(),
        }
    }
}

impl MigrationConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MigrationError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MigrationError::InvalidConfig {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    /// Reject empty names
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("namespace", &self.namespace),
            ("legacy_type_name", &self.legacy_type_name),
            ("replacement_type_name", &self.replacement_type_name),
            ("tabular_layout", &self.tabular_layout),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(MigrationError::InvalidConfig {
                    reason: format!("{} cannot be empty", name),
                });
            }
        }
        Ok(())
    }

    /// New view method for a legacy one, if it has a counterpart
    pub fn map_layout(&self, legacy: &str) -> Option<&str> {
        self.layouts.get(legacy).map(String::as_str)
    }
}
