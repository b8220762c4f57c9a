//! Querystring registry
//!
//! The registry is owned by the site and populated before any migration runs.
//! It says which catalog indexes may be queried, whether they are enabled,
//! which operations each permits, and which function implements each
//! operation.
//!
//! ```text
//! registry.json ──► RegistryManifest ──┐
//!                                      ├──► QuerystringRegistry (read-only)
//! catalog.json  ──► OperationCatalog ──┘        │
//!                                               ▼
//!                                    converters ask: known? enabled?
//!                                    permitted? resolvable?
//! ```

mod catalog;
mod loader;
mod lookup;
mod manifest;

pub use catalog::OperationCatalog;
pub use loader::RegistryLoader;
pub use lookup::{OperationEntry, QuerystringRegistry};
pub use manifest::{
    FieldRecord, OperationRecord, RecordKey, RegistryBuilder, RegistryManifest, RegistryRecord,
    DEFAULT_NAMESPACE, QUERYPARSER_MODULE,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    #[test]
    fn test_standard_registry_round_trip() {
        let registry = QuerystringRegistry::standard().unwrap();
        let mut diag = Diagnostics::new();

        let today = registry.operation_id("date.today");
        assert_eq!(
            registry.valid_operation("created", &today, &mut diag),
            Some(today.clone())
        );

        let reference = registry.operation_id("reference.is");
        assert_eq!(
            registry.valid_operation("getRawRelatedItems", &reference, &mut diag),
            None
        );
        assert_eq!(diag.error_count(), 1);
    }
}
