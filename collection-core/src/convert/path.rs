//! Path and relative path values
//!
//! The new query only searches recursively. Non-recursive criteria are widened
//! and a warning is recorded.

use serde_json::Value;

use crate::criteria::LegacyCriterion;
use crate::diagnostics::{codes, Diagnostics};

use super::Operand;

/// Value of a path item: the first stored path or UID
pub(super) fn path_value(
    value: &Value,
    index: &str,
    criterion: &LegacyCriterion,
    diag: &mut Diagnostics,
) -> Operand {
    warn_non_recursive(value, index, criterion, diag);

    match criterion.raw_value.as_slice() {
        [] => Operand::Unsupported,
        [first, rest @ ..] => {
            if !rest.is_empty() {
                diag.warn(
                    codes::MULTIPLE_PATHS,
                    index,
                    format!(
                        "Multiple paths in query. Using only the first. {}",
                        value.get("query").unwrap_or(value)
                    ),
                );
            }
            Operand::Value(Value::String(first.clone()))
        }
    }
}

/// Value of a relative path item: the path relative to the Topic
pub(super) fn relative_path_value(
    value: &Value,
    index: &str,
    criterion: &LegacyCriterion,
    diag: &mut Diagnostics,
) -> Operand {
    warn_non_recursive(value, index, criterion, diag);

    match &criterion.relative_path {
        Some(path) => Operand::Value(Value::String(path.clone())),
        None => Operand::Absent,
    }
}

fn warn_non_recursive(
    value: &Value,
    index: &str,
    criterion: &LegacyCriterion,
    diag: &mut Diagnostics,
) {
    if !criterion.recurse {
        diag.warn(
            codes::NON_RECURSIVE_PATH,
            index,
            format!(
                "Cannot handle non-recursive path search. Allowing recursive search. {}",
                value
            ),
        );
    }
}
