//! Run report
//!
//! One report per walk. Each migrated object gets the digest of its new
//! query, so two runs over the same content can be diffed object by object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, Level};

/// Which batch migration produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationKind {
    Topics,
    FolderishCollections,
}

impl std::fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationKind::Topics => write!(f, "topics"),
            MigrationKind::FolderishCollections => write!(f, "folderish_collections"),
        }
    }
}

/// Outcome for one migrated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectReport {
    pub path: String,

    /// Portal type after migration
    pub portal_type: String,

    /// Number of query rows on the migrated object
    pub rows: usize,

    /// SHA-256 of the canonical query
    pub query_digest: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of one batch walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub run_id: Uuid,
    pub kind: MigrationKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub migrated: Vec<ObjectReport>,

    /// Paths rejected by the pre-check
    pub skipped: Vec<String>,
}

impl MigrationReport {
    /// Start an empty report
    pub fn begin(kind: MigrationKind) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            kind,
            started_at: now,
            finished_at: now,
            migrated: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Stamp the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Report for `path`, if it was migrated
    pub fn object(&self, path: &str) -> Option<&ObjectReport> {
        self.migrated.iter().find(|o| o.path == path)
    }

    /// Number of diagnostics at `level` across all objects
    pub fn count_at(&self, level: Level) -> usize {
        self.migrated
            .iter()
            .flat_map(|o| o.diagnostics.iter())
            .filter(|d| d.level == level)
            .count()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} run {}: {} migrated, {} skipped, {} errors, {} warnings",
            self.kind,
            self.run_id,
            self.migrated.len(),
            self.skipped.len(),
            self.count_at(Level::Error),
            self.count_at(Level::Warning)
        )
    }
}
