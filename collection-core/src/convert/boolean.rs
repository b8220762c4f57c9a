//! Boolean criteria
//!
//! The legacy value is the set of values the index must match, e.g.
//! `[1, true, "1", "True"]` or `[0, "", false, "0", "False", null]`. Only the
//! operation carries meaning; the emitted row has no value.

use serde_json::Value;

use crate::diagnostics::{codes, Diagnostics};

/// New index name for a legacy boolean index
pub(super) fn remap_field(index: &str) -> &str {
    match index {
        "is_folderish" => "isFolderish",
        "is_default_page" => "isDefaultPage",
        other => other,
    }
}

/// `boolean.isTrue` or `boolean.isFalse`, defaulting to true
pub(super) fn operation_code(value: &Value, index: &str, diag: &mut Diagnostics) -> &'static str {
    let values: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    if values.iter().any(|v| is_bool(v, true)) {
        "boolean.isTrue"
    } else if values.iter().any(|v| is_bool(v, false)) {
        "boolean.isFalse"
    } else {
        diag.warn(
            codes::BOOLEAN_VALUE_UNKNOWN,
            index,
            format!("Unknown value for boolean criterion. Falling back to True. {}", value),
        );
        "boolean.isTrue"
    }
}

/// Booleans compare equal to the integers 1 and 0
fn is_bool(value: &Value, target: bool) -> bool {
    match value {
        Value::Bool(b) => *b == target,
        Value::Number(n) => n.as_f64() == Some(if target { 1.0 } else { 0.0 }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tests::run;
    use crate::convert::CriterionConverter;
    use crate::criteria::{types, LegacyCriterion};
    use serde_json::json;

    #[test]
    fn test_remap_field() {
        assert_eq!(remap_field("is_folderish"), "isFolderish");
        assert_eq!(remap_field("is_default_page"), "isDefaultPage");
        assert_eq!(remap_field("isFolderish"), "isFolderish");
    }

    #[test]
    fn test_operation_choice() {
        let mut diag = Diagnostics::new();
        assert_eq!(
            operation_code(&json!([1, true, "1", "True"]), "x", &mut diag),
            "boolean.isTrue"
        );
        assert_eq!(
            operation_code(&json!([0, "", false, "0", "False", null]), "x", &mut diag),
            "boolean.isFalse"
        );
        assert_eq!(operation_code(&json!(1), "x", &mut diag), "boolean.isTrue");
        assert!(diag.is_empty());

        assert_eq!(operation_code(&json!([]), "x", &mut diag), "boolean.isTrue");
        assert_eq!(operation_code(&json!(["yes"]), "x", &mut diag), "boolean.isTrue");
        assert_eq!(diag.warning_count(), 2);
    }

    #[test]
    fn test_legacy_index_is_remapped() {
        let criterion = LegacyCriterion::new(types::BOOLEAN, "is_folderish")
            .with_value(json!([0, "", false, "0", "False", null]));
        let (rows, diag) = run(CriterionConverter::Boolean, &criterion);
        let rows = rows.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, "isFolderish");
        assert_eq!(rows[0].operation_code(), "boolean.isFalse");
        assert_eq!(rows[0].value, None);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_one_row_per_item() {
        let criterion = LegacyCriterion::new(types::BOOLEAN, "is_default_page")
            .with_item("is_default_page", json!([1, true]))
            .with_item("isFolderish", json!(["?"]));
        let (rows, diag) = run(CriterionConverter::Boolean, &criterion);
        let rows = rows.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, "isDefaultPage");
        assert_eq!(rows[0].operation_code(), "boolean.isTrue");
        assert_eq!(rows[1].operation_code(), "boolean.isTrue");
        assert!(diag.contains(codes::BOOLEAN_VALUE_UNKNOWN));
    }
}
