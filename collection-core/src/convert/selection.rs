//! Selection, list, reference and portal type values
//!
//! Topics stop existing once migrated, so a query that selected the `Topic`
//! type would match nothing. The legacy name is replaced by the new one.

use serde_json::Value;

use crate::diagnostics::codes;

use super::{malformed, ConversionContext, Operand};

/// Value of a selection-style item: `{"query": [...], "operator": "or"}`
pub(super) fn selection_value(
    value: &Value,
    index: &str,
    ctx: &mut ConversionContext<'_>,
) -> Operand {
    let Some(query) = value.get("query") else {
        return malformed(value, index, ctx.diag);
    };

    if value.get("operator").and_then(Value::as_str) == Some("and") {
        ctx.diag.warn(
            codes::SELECTION_AND_DEGRADED,
            index,
            format!("Cannot handle selection operator 'and'. Using 'or'. {}", value),
        );
    }

    Operand::from_value(substitute_type_name(
        query,
        ctx.legacy_type_name,
        ctx.replacement_type_name,
    ))
}

/// Value of a portal type item: the type list itself
pub(super) fn portal_type_value(value: &Value, ctx: &mut ConversionContext<'_>) -> Operand {
    Operand::from_value(substitute_type_name(
        value,
        ctx.legacy_type_name,
        ctx.replacement_type_name,
    ))
}

/// Replace every `legacy` string in `values` by `replacement`
fn substitute_type_name(values: &Value, legacy: &str, replacement: &str) -> Value {
    let swap = |value: &Value| match value {
        Value::String(name) if name == legacy => Value::String(replacement.to_string()),
        other => other.clone(),
    };
    match values {
        Value::Array(items) => Value::Array(items.iter().map(swap).collect()),
        other => swap(other),
    }
}
