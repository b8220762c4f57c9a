//! Relative date criteria
//!
//! A legacy date criterion is an (operation, offset in days, direction)
//! triple. It maps onto one of several date operations:
//!
//! | Operation | Offset | Row |
//! |---|---|---|
//! | `within_day` | lands on today | `date.today` |
//! | `within_day` | other day | `date.between` `[00:00:00, 23:59:59]` of that day |
//! | `more` | non-zero | `date.largerThanRelativeDate` with the offset |
//! | `more` | zero | `date.afterToday` |
//! | `less` | non-zero | `date.lessThanRelativeDate` with the offset |
//! | `less` | zero | `date.beforeToday` |
//!
//! The offset is negated first when the direction is `-` (past). Other
//! operations produce no row and are recorded for review.
//!
//! A date filter cannot be narrowed safely, so an operation the registry does
//! not permit or cannot resolve is an error rather than a skipped item.

use chrono::Duration;
use serde_json::{json, Value};

use crate::criteria::LegacyCriterion;
use crate::diagnostics::codes;
use crate::error::{MigrationError, Result};
use crate::query::{NormalizedQuery, QueryRow};
use crate::timing::{earliest_time, is_same_day, latest_time};

use super::ConversionContext;

pub(super) fn convert(
    rows: &mut NormalizedQuery,
    criterion: &LegacyCriterion,
    ctx: &mut ConversionContext<'_>,
) -> Result<()> {
    let Some(offset) = criterion.value else {
        return Ok(());
    };
    let field = criterion.field.as_str();

    if !ctx.registry.is_field_known(field, ctx.diag) {
        return Ok(());
    }
    ctx.registry.is_field_enabled(field, ctx.diag);

    let offset = if criterion.is_past() {
        offset
            .checked_neg()
            .ok_or_else(|| invalid(criterion, "date offset out of range"))?
    } else {
        offset
    };

    let now = ctx.clock.now();
    let date = Duration::try_days(offset)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| invalid(criterion, "date offset out of range"))?;

    let operation = criterion.operation.as_deref().unwrap_or_default();
    let (code, value): (&str, Option<Value>) = match operation {
        "within_day" => {
            if is_same_day(&date, &now) {
                ("date.today", None)
            } else {
                let window = [
                    earliest_time(&date).to_rfc3339(),
                    latest_time(&date).to_rfc3339(),
                ];
                ("date.between", Some(json!(window)))
            }
        }
        "more" if offset != 0 => ("date.largerThanRelativeDate", Some(json!(offset))),
        "more" => ("date.afterToday", None),
        "less" if offset != 0 => ("date.lessThanRelativeDate", Some(json!(offset))),
        "less" => ("date.beforeToday", None),
        other => {
            ctx.diag.info(
                codes::DATE_OPERATION_DROPPED,
                field,
                format!(
                    "Date operation {:?} is not handled. Criterion dropped: {} {}",
                    other, criterion.criterion_type, criterion.field
                ),
            );
            return Ok(());
        }
    };

    let candidate = ctx.registry.operation_id(code);
    let operation = ctx
        .registry
        .valid_operation(field, &candidate, ctx.diag)
        .ok_or_else(|| invalid(criterion, &candidate))?;

    let row = QueryRow::new(field, operation);
    rows.push(match value {
        Some(value) => row.with_value(value),
        None => row,
    });
    Ok(())
}

fn invalid(criterion: &LegacyCriterion, operation: &str) -> MigrationError {
    MigrationError::InvalidDateOperation {
        operation: operation.to_string(),
        criterion_type: criterion.criterion_type.clone(),
        field: criterion.field.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tests::{run, run_with};
    use crate::convert::CriterionConverter;
    use crate::criteria::types;
    use crate::diagnostics::Level;
    use crate::registry::{OperationCatalog, QuerystringRegistry, RegistryManifest};

    fn date_criterion(operation: &str, offset: i64, direction: &str) -> LegacyCriterion {
        LegacyCriterion::new(types::DATE, "created").with_date(operation, offset, direction)
    }

    #[test]
    fn test_within_day_today() {
        let (rows, _) = run(
            CriterionConverter::Date,
            &date_criterion("within_day", 0, "+"),
        );
        let rows = rows.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].operation_code(), "date.today");
        assert_eq!(rows[0].value, None);
    }

    #[test]
    fn test_within_day_between_window() {
        // Clock is 2013-03-28T14:30:00+01:00
        let (rows, _) = run(
            CriterionConverter::Date,
            &date_criterion("within_day", 2, "+"),
        );
        let rows = rows.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].operation_code(), "date.between");
        assert_eq!(
            rows[0].value,
            Some(json!([
                "2013-03-30T00:00:00+01:00",
                "2013-03-30T23:59:59+01:00"
            ]))
        );

        let (past, _) = run(
            CriterionConverter::Date,
            &date_criterion("within_day", 1, "-"),
        );
        assert_eq!(
            past.unwrap()[0].value,
            Some(json!([
                "2013-03-27T00:00:00+01:00",
                "2013-03-27T23:59:59+01:00"
            ]))
        );
    }

    #[test]
    fn test_more_and_less() {
        let cases = [
            ("more", 5, "+", "date.largerThanRelativeDate", Some(json!(5))),
            ("more", 0, "+", "date.afterToday", None),
            ("less", 5, "-", "date.lessThanRelativeDate", Some(json!(-5))),
            ("less", 0, "-", "date.beforeToday", None),
        ];
        for (operation, offset, direction, code, value) in cases {
            let (rows, _) = run(
                CriterionConverter::Date,
                &date_criterion(operation, offset, direction),
            );
            let rows = rows.unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].index, "created");
            assert_eq!(rows[0].operation_code(), code);
            assert_eq!(rows[0].value, value);
        }
    }

    #[test]
    fn test_missing_offset_emits_nothing() {
        let mut criterion = date_criterion("more", 5, "+");
        criterion.value = None;
        let (rows, diag) = run(CriterionConverter::Date, &criterion);
        assert!(rows.unwrap().is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_unknown_operation_is_dropped_for_review() {
        let (rows, diag) = run(
            CriterionConverter::Date,
            &date_criterion("whenever", 3, "+"),
        );
        assert!(rows.unwrap().is_empty());
        assert_eq!(diag.entries()[0].level, Level::Info);
        assert!(diag.contains(codes::DATE_OPERATION_DROPPED));
    }

    #[test]
    fn test_unknown_field_emits_nothing() {
        let criterion =
            LegacyCriterion::new(types::DATE, "no_such_index").with_date("more", 5, "+");
        let (rows, diag) = run(CriterionConverter::Date, &criterion);
        assert!(rows.unwrap().is_empty());
        assert!(diag.contains(codes::UNKNOWN_FIELD));
    }

    #[test]
    fn test_unpermitted_operation_is_fatal() {
        let manifest = RegistryManifest::builder("plone.app.querystring")
            .field("created", true, &["date.today"])
            .operation("date.today", "plone.app.querystring.queryparser._today")
            .operation(
                "date.largerThanRelativeDate",
                "plone.app.querystring.queryparser._largerThanRelativeDate",
            )
            .build();
        let registry = QuerystringRegistry::load(&manifest, &OperationCatalog::standard()).unwrap();

        let (result, _) = run_with(
            &registry,
            CriterionConverter::Date,
            &date_criterion("more", 5, "+"),
        );
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATE_OPERATION");
        assert!(err
            .to_string()
            .contains("plone.app.querystring.operation.date.largerThanRelativeDate"));
    }

    #[test]
    fn test_unresolvable_operation_is_fatal() {
        let catalog = OperationCatalog::standard()
            .without_implementation("plone.app.querystring.queryparser._today");
        let registry = QuerystringRegistry::load(&RegistryManifest::standard(), &catalog).unwrap();

        let (result, diag) = run_with(
            &registry,
            CriterionConverter::Date,
            &date_criterion("within_day", 0, "+"),
        );
        assert!(result.is_err());
        assert!(diag.contains(codes::UNRESOLVABLE_OPERATION));
    }

    #[test]
    fn test_extreme_offsets_are_rejected() {
        for (offset, direction) in [(i64::MIN, "-"), (i64::MAX, "+"), (i64::MIN, "+")] {
            let (rows, _) = run(
                CriterionConverter::Date,
                &date_criterion("more", offset, direction),
            );
            let err = rows.unwrap_err();
            assert_eq!(err.error_code(), "INVALID_DATE_OPERATION", "{} {}", offset, direction);
        }
    }
}
