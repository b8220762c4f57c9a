//! Criterion converters
//!
//! Each legacy criterion type has one converter that appends zero or more
//! [`QueryRow`]s to the query being assembled. All converters except the
//! date converter share one loop over the criterion's (index, value) items:
//!
//! 1. Skip the item if the index is not a criterion field (logged by the registry)
//! 2. Warn if the field is disabled, then carry on
//! 3. Derive the candidate operation; skip the item unless it is permitted
//!    for the field and resolvable
//! 4. Derive the query value through the type's value hook
//! 5. Append the row, without a value when the hook returns [`Operand::Absent`]
//!
//! Problems in this loop only ever drop one item. The date converter follows
//! its own protocol (see [`date`]) and returns an error instead.

mod boolean;
mod date;
mod dispatch;
mod integer;
mod path;
mod selection;

pub use dispatch::ConverterTable;

use serde_json::Value;

use crate::criteria::LegacyCriterion;
use crate::diagnostics::{codes, Diagnostics};
use crate::error::Result;
use crate::query::{NormalizedQuery, QueryRow};
use crate::registry::QuerystringRegistry;
use crate::timing::Clock;

/// Legacy content type name replaced in selection values
pub const LEGACY_TYPE_NAME: &str = "Topic";

/// Content type name substituted for [`LEGACY_TYPE_NAME`]
pub const REPLACEMENT_TYPE_NAME: &str = "Collection";

/// Result of a value hook
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Emit the row with this value
    Value(Value),
    /// Emit the row without a value
    Absent,
    /// Drop the item
    Unsupported,
}

impl Operand {
    /// Wrap a value, treating JSON null as absent
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Operand::Absent,
            value => Operand::Value(value),
        }
    }
}

/// Everything a converter needs besides the criterion itself
pub struct ConversionContext<'a> {
    pub registry: &'a QuerystringRegistry,
    pub clock: &'a dyn Clock,
    pub legacy_type_name: &'a str,
    pub replacement_type_name: &'a str,
    pub diag: &'a mut Diagnostics,
}

impl<'a> ConversionContext<'a> {
    /// Context with the default type names
    pub fn new(
        registry: &'a QuerystringRegistry,
        clock: &'a dyn Clock,
        diag: &'a mut Diagnostics,
    ) -> Self {
        Self {
            registry,
            clock,
            legacy_type_name: LEGACY_TYPE_NAME,
            replacement_type_name: REPLACEMENT_TYPE_NAME,
            diag,
        }
    }

    /// Override the type names used for substitution
    pub fn with_type_names(mut self, legacy: &'a str, replacement: &'a str) -> Self {
        self.legacy_type_name = legacy;
        self.replacement_type_name = replacement;
        self
    }
}

/// One converter per legacy criterion shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionConverter {
    SimpleString,
    CurrentAuthor,
    /// Selection and list criteria
    Selection,
    Reference,
    PortalType,
    Path,
    RelativePath,
    DateRange,
    Boolean,
    SimpleInt,
    Date,
}

impl CriterionConverter {
    /// Append the rows for `criterion` to `rows`
    ///
    /// Only [`CriterionConverter::Date`] returns an error.
    pub fn convert(
        &self,
        rows: &mut NormalizedQuery,
        criterion: &LegacyCriterion,
        ctx: &mut ConversionContext<'_>,
    ) -> Result<()> {
        match self {
            CriterionConverter::Date => date::convert(rows, criterion, ctx),
            _ => {
                self.convert_items(rows, criterion, ctx);
                Ok(())
            }
        }
    }

    /// Stable converter name (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            CriterionConverter::SimpleString => "simple_string",
            CriterionConverter::CurrentAuthor => "current_author",
            CriterionConverter::Selection => "selection",
            CriterionConverter::Reference => "reference",
            CriterionConverter::PortalType => "portal_type",
            CriterionConverter::Path => "path",
            CriterionConverter::RelativePath => "relative_path",
            CriterionConverter::DateRange => "date_range",
            CriterionConverter::Boolean => "boolean",
            CriterionConverter::SimpleInt => "simple_int",
            CriterionConverter::Date => "date",
        }
    }

    fn convert_items(
        &self,
        rows: &mut NormalizedQuery,
        criterion: &LegacyCriterion,
        ctx: &mut ConversionContext<'_>,
    ) {
        for item in &criterion.items {
            let field = self.field_name(&item.index);

            if !ctx.registry.is_field_known(field, ctx.diag) {
                continue;
            }
            ctx.registry.is_field_enabled(field, ctx.diag);

            let candidate = self
                .operation_code(&item.value, field, ctx.diag)
                .map(|code| ctx.registry.operation_id(code));
            let operation = candidate
                .as_deref()
                .and_then(|id| ctx.registry.valid_operation(field, id, ctx.diag));
            let Some(operation) = operation else {
                ctx.diag.error(
                    codes::INVALID_OPERATION,
                    field,
                    format!(
                        "Invalid operation {} for criterion: {} {}",
                        candidate.as_deref().unwrap_or("None"),
                        criterion.criterion_type,
                        criterion.field
                    ),
                );
                continue;
            };

            let row = QueryRow::new(field, operation);
            match self.query_value(&item.value, field, criterion, ctx) {
                Operand::Value(value) => rows.push(row.with_value(value)),
                Operand::Absent => rows.push(row),
                Operand::Unsupported => {}
            }
        }
    }

    /// Index the row is emitted under
    fn field_name<'i>(&self, index: &'i str) -> &'i str {
        match self {
            CriterionConverter::Boolean => boolean::remap_field(index),
            _ => index,
        }
    }

    /// Operation code for one item, or None if the value rules one out
    fn operation_code(
        &self,
        value: &Value,
        index: &str,
        diag: &mut Diagnostics,
    ) -> Option<&'static str> {
        match self {
            CriterionConverter::SimpleString => Some("string.contains"),
            CriterionConverter::CurrentAuthor => Some("string.currentUser"),
            CriterionConverter::Selection | CriterionConverter::PortalType => Some("selection.is"),
            CriterionConverter::Reference => Some("reference.is"),
            CriterionConverter::Path => Some("string.path"),
            CriterionConverter::RelativePath => Some("string.relativePath"),
            CriterionConverter::DateRange => Some("date.between"),
            CriterionConverter::Boolean => Some(boolean::operation_code(value, index, diag)),
            CriterionConverter::SimpleInt => integer::operation_code(value, index, diag),
            CriterionConverter::Date => None,
        }
    }

    fn query_value(
        &self,
        value: &Value,
        index: &str,
        criterion: &LegacyCriterion,
        ctx: &mut ConversionContext<'_>,
    ) -> Operand {
        match self {
            CriterionConverter::SimpleString | CriterionConverter::CurrentAuthor => {
                Operand::from_value(value.clone())
            }
            CriterionConverter::Selection | CriterionConverter::Reference => {
                selection::selection_value(value, index, ctx)
            }
            CriterionConverter::PortalType => selection::portal_type_value(value, ctx),
            CriterionConverter::Path => path::path_value(value, index, criterion, ctx.diag),
            CriterionConverter::RelativePath => {
                path::relative_path_value(value, index, criterion, ctx.diag)
            }
            CriterionConverter::DateRange => match value.get("query") {
                Some(query) => Operand::from_value(query.clone()),
                None => malformed(value, index, ctx.diag),
            },
            CriterionConverter::Boolean => Operand::Absent,
            CriterionConverter::SimpleInt => integer::int_value(value, index, ctx.diag),
            CriterionConverter::Date => Operand::Unsupported,
        }
    }
}

/// Record a value without the expected `query` key
fn malformed(value: &Value, index: &str, diag: &mut Diagnostics) -> Operand {
    diag.warn(
        codes::MALFORMED_VALUE,
        index,
        format!("Criterion value has no query: {}", value),
    );
    Operand::Unsupported
}
