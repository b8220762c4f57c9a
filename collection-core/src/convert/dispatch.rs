//! Converter dispatch table
//!
//! Maps each legacy criterion type name to its converter. The table is
//! built once and never changes; a type without an entry cannot be
//! approximated and aborts the migration.

use std::collections::HashMap;

use crate::criteria::{types, LegacyCriterion};
use crate::error::{MigrationError, Result};
use crate::query::NormalizedQuery;

use super::{ConversionContext, CriterionConverter};

/// Immutable type name to converter mapping
#[derive(Debug, Clone)]
pub struct ConverterTable {
    converters: HashMap<&'static str, CriterionConverter>,
}

impl ConverterTable {
    /// The table for every legacy criterion type that has a query counterpart
    ///
    /// The sort criterion is absent: the migration driver handles it.
    pub fn standard() -> Self {
        let converters = HashMap::from([
            (types::BOOLEAN, CriterionConverter::Boolean),
            (types::CURRENT_AUTHOR, CriterionConverter::CurrentAuthor),
            (types::DATE, CriterionConverter::Date),
            (types::DATE_RANGE, CriterionConverter::DateRange),
            (types::LIST, CriterionConverter::Selection),
            (types::PATH, CriterionConverter::Path),
            (types::PORTAL_TYPE, CriterionConverter::PortalType),
            (types::REFERENCE, CriterionConverter::Reference),
            (types::RELATIVE_PATH, CriterionConverter::RelativePath),
            (types::SELECTION, CriterionConverter::Selection),
            (types::SIMPLE_INT, CriterionConverter::SimpleInt),
            (types::SIMPLE_STRING, CriterionConverter::SimpleString),
        ]);
        Self { converters }
    }

    /// Converter for a type name
    pub fn get(&self, criterion_type: &str) -> Option<CriterionConverter> {
        self.converters.get(criterion_type).copied()
    }

    /// Converter for a criterion, or an `UnsupportedCriterion` error
    pub fn converter_for(&self, criterion: &LegacyCriterion) -> Result<CriterionConverter> {
        self.get(&criterion.criterion_type)
            .ok_or_else(|| MigrationError::UnsupportedCriterion {
                criterion_type: criterion.criterion_type.clone(),
                field: criterion.field.clone(),
            })
    }

    /// Look up and run the converter for `criterion`
    pub fn convert(
        &self,
        rows: &mut NormalizedQuery,
        criterion: &LegacyCriterion,
        ctx: &mut ConversionContext<'_>,
    ) -> Result<()> {
        let converter = self.converter_for(criterion)?;
        tracing::trace!(
            "Converting {} on {} with {} converter",
            criterion.criterion_type,
            criterion.field,
            converter.name()
        );
        converter.convert(rows, criterion, ctx)
    }

    pub fn supports(&self, criterion_type: &str) -> bool {
        self.converters.contains_key(criterion_type)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.converters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for ConverterTable {
    fn default() -> Self {
        Self::standard()
    }
}
