use crate::domain::model::{
    ClassificationResult, EligibilityLabel, Table, Value, ELIGIBILITY_COLUMN, REASON_COLUMN,
};
use crate::utils::error::Result;

pub const REASON_ZERO: &str = "Zero balance across selected months";
pub const REASON_INCREASING: &str = "Strictly increasing debt across selected months";
pub const REASON_DECREASING: &str = "Strictly decreasing debt across selected months";
pub const REASON_CONSTANT: &str = "Constant balance across selected months (Dormant)";
pub const REASON_MIXED: &str = "Mixed behaviour";

/// Applies the eligibility rule to three chronologically ordered balances.
///
/// The arms overlap (all-zero is also constant), so their order matters:
/// the first arm that matches decides the label.
pub fn classify_values(v1: f64, v2: f64, v3: f64) -> ClassificationResult {
    let (eligibility, reason) = if v1 == 0.0 && v2 == 0.0 && v3 == 0.0 {
        (EligibilityLabel::Eligible, REASON_ZERO)
    } else if v1 < v2 && v2 < v3 {
        (EligibilityLabel::Ineligible, REASON_INCREASING)
    } else if v1 > v2 && v2 > v3 {
        (EligibilityLabel::Eligible, REASON_DECREASING)
    } else if v1 == v2 && v2 == v3 {
        (EligibilityLabel::Dormant, REASON_CONSTANT)
    } else {
        (EligibilityLabel::Ineligible, REASON_MIXED)
    };

    ClassificationResult { eligibility, reason }
}

/// Classifies every row of `table` from the three balance columns and returns
/// a new table with `DebtEligibility` and `Reason` columns.
///
/// Missing or unparsable balances count as zero. Distinctness of the three
/// columns is the caller's concern.
pub fn classify(table: &Table, col_m1: &str, col_m2: &str, col_m3: &str) -> Result<Table> {
    let m1 = table.require_column(col_m1)?.values();
    let m2 = table.require_column(col_m2)?.values();
    let m3 = table.require_column(col_m3)?.values();

    let (labels, reasons): (Vec<Value>, Vec<Value>) = m1
        .iter()
        .zip(m2)
        .zip(m3)
        .map(|((a, b), c)| {
            let result = classify_values(a.coerce_number(), b.coerce_number(), c.coerce_number());
            (
                Value::from(result.eligibility.as_str()),
                Value::from(result.reason),
            )
        })
        .unzip();

    tracing::debug!(
        "Classified {} rows using '{}' -> '{}' -> '{}'",
        labels.len(),
        col_m1,
        col_m2,
        col_m3
    );

    table
        .with_column(ELIGIBILITY_COLUMN, labels)?
        .with_column(REASON_COLUMN, reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Column;
    use crate::utils::error::EtlError;

    fn label(v1: f64, v2: f64, v3: f64) -> EligibilityLabel {
        classify_values(v1, v2, v3).eligibility
    }

    #[test]
    fn test_rule_table() {
        assert_eq!(classify_values(0.0, 0.0, 0.0).reason, REASON_ZERO);
        assert_eq!(label(10.0, 20.0, 30.0), EligibilityLabel::Ineligible);
        assert_eq!(classify_values(10.0, 20.0, 30.0).reason, REASON_INCREASING);
        assert_eq!(label(30.0, 20.0, 10.0), EligibilityLabel::Eligible);
        assert_eq!(classify_values(30.0, 20.0, 10.0).reason, REASON_DECREASING);
        assert_eq!(label(7.0, 7.0, 7.0), EligibilityLabel::Dormant);
        assert_eq!(classify_values(5.0, 3.0, 4.0).reason, REASON_MIXED);
        assert_eq!(label(5.0, 3.0, 4.0), EligibilityLabel::Ineligible);
    }

    #[test]
    fn test_all_zero_wins_over_constant() {
        let result = classify_values(0.0, 0.0, 0.0);
        assert_eq!(result.eligibility, EligibilityLabel::Eligible);
        assert_ne!(result.reason, REASON_CONSTANT);
    }

    #[test]
    fn test_partial_plateaus_are_mixed() {
        assert_eq!(classify_values(10.0, 10.0, 20.0).reason, REASON_MIXED);
        assert_eq!(classify_values(20.0, 10.0, 10.0).reason, REASON_MIXED);
        assert_eq!(classify_values(0.0, 0.0, 5.0).reason, REASON_MIXED);
    }

    #[test]
    fn test_decreasing_into_negative_is_eligible() {
        assert_eq!(label(10.0, 0.0, -10.0), EligibilityLabel::Eligible);
        assert_eq!(label(-5.0, -5.0, -5.0), EligibilityLabel::Dormant);
    }

    #[test]
    fn test_missing_values_behave_like_zero() {
        let table = Table::from_columns(vec![
            Column::new("m1", vec![Value::Null, Value::from("0")]),
            Column::new("m2", vec![Value::from("abc"), Value::from("0")]),
            Column::new("m3", vec![Value::Null, Value::from("0")]),
        ])
        .unwrap();

        let out = classify(&table, "m1", "m2", "m3").unwrap();
        let labels = out.column(ELIGIBILITY_COLUMN).unwrap().values();
        let reasons = out.column(REASON_COLUMN).unwrap().values();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(reasons[0], Value::from(REASON_ZERO));
        assert_eq!(reasons[0], reasons[1]);
    }

    #[test]
    fn test_classify_appends_columns_and_keeps_input() {
        let table = Table::from_columns(vec![
            Column::new("member", vec![Value::from("1"), Value::from("2")]),
            Column::new("m1", vec![Value::from("100"), Value::from("5")]),
            Column::new("m2", vec![Value::from("50"), Value::from("3")]),
            Column::new("m3", vec![Value::from("50"), Value::from("4")]),
        ])
        .unwrap();

        let out = classify(&table, "m1", "m2", "m3").unwrap();
        assert_eq!(
            out.column_names(),
            vec!["member", "m1", "m2", "m3", "DebtEligibility", "Reason"]
        );
        assert_eq!(out.row_count(), 2);
        assert_eq!(
            out.column(ELIGIBILITY_COLUMN).unwrap().values(),
            &[Value::from("Ineligible"), Value::from("Ineligible")]
        );
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn test_existing_result_columns_are_overwritten() {
        let table = Table::from_columns(vec![
            Column::new("DebtEligibility", vec![Value::from("stale")]),
            Column::new("m1", vec![Value::from("3")]),
        ])
        .unwrap();

        let out = classify(&table, "m1", "m1", "m1").unwrap();
        assert_eq!(out.column_names(), vec!["DebtEligibility", "m1", "Reason"]);
        // duplicate selection degenerates to a constant comparison
        assert_eq!(
            out.column(ELIGIBILITY_COLUMN).unwrap().values()[0],
            Value::from("Dormant")
        );
    }

    #[test]
    fn test_missing_column() {
        let table = Table::from_columns(vec![Column::new("m1", vec![])]).unwrap();
        let err = classify(&table, "m1", "m2", "m1").unwrap_err();
        assert!(matches!(err, EtlError::ColumnNotFound { column } if column == "m2"));
    }
}
