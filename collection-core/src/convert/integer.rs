//! Integer criteria
//!
//! The legacy value is `{"query": n, "range": "min" | "max" | null}`. A range
//! of both bounds or more than one integer has no counterpart in the new
//! query; such items are dropped with a warning.

use serde_json::Value;

use crate::diagnostics::{codes, Diagnostics};

use super::{malformed, Operand};

/// Operation code for the item's range direction
pub(super) fn operation_code(
    value: &Value,
    index: &str,
    diag: &mut Diagnostics,
) -> Option<&'static str> {
    match value.get("range") {
        None | Some(Value::Null) => Some("int.is"),
        Some(Value::String(range)) => match range.as_str() {
            "" => Some("int.is"),
            "min" => Some("int.largerThan"),
            "max" => Some("int.lessThan"),
            "min:max" => {
                diag.warn(
                    codes::INT_RANGE_UNSUPPORTED,
                    index,
                    format!("min:max direction not supported for integers. {}", value),
                );
                None
            }
            _ => {
                unknown_direction(value, index, diag);
                None
            }
        },
        Some(_) => {
            unknown_direction(value, index, diag);
            None
        }
    }
}

/// The integer operand
pub(super) fn int_value(value: &Value, index: &str, diag: &mut Diagnostics) -> Operand {
    match value.get("query") {
        None => malformed(value, index, diag),
        Some(Value::Array(_)) => {
            diag.warn(
                codes::INT_MULTIPLE_VALUES,
                index,
                format!("More than one integer is not supported. {}", value),
            );
            Operand::Unsupported
        }
        Some(query) => Operand::from_value(query.clone()),
    }
}

fn unknown_direction(value: &Value, index: &str, diag: &mut Diagnostics) {
    diag.warn(
        codes::INT_DIRECTION_UNKNOWN,
        index,
        format!("Unknown direction for integers. {}", value),
    );
}
