use crate::domain::model::{Summary, SummaryEntry, Table};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Counts rows per distinct value of `label_column`.
///
/// Entries are ordered by count, most frequent first; ties keep the order in
/// which the labels first appear. Unknown labels are counted like any other,
/// and a missing label is counted under the empty string.
pub fn summarize(table: &Table, label_column: &str) -> Result<Summary> {
    let column = table.require_column(label_column)?;

    let mut entries: Vec<SummaryEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in column.values() {
        let label = value.to_string();
        match index.get(&label) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(label.clone(), entries.len());
                entries.push(SummaryEntry { label, count: 1 });
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(Summary { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Column, Value};

    fn labels(values: &[&str]) -> Table {
        Table::from_columns(vec![Column::new(
            "DebtEligibility",
            values.iter().map(|v| Value::from_raw(v)).collect(),
        )])
        .unwrap()
    }

    #[test]
    fn test_counts_and_order() {
        let table = labels(&[
            "Dormant",
            "Eligible",
            "Eligible",
            "Ineligible",
            "Dormant",
            "Eligible",
        ]);
        let summary = summarize(&table, "DebtEligibility").unwrap();

        assert_eq!(summary.labels(), vec!["Eligible", "Dormant", "Ineligible"]);
        assert_eq!(summary.count_of("Eligible"), 3);
        assert_eq!(summary.total(), table.row_count());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = labels(&["Ineligible", "Eligible", "Eligible", "Ineligible"]);
        let summary = summarize(&table, "DebtEligibility").unwrap();
        assert_eq!(summary.labels(), vec!["Ineligible", "Eligible"]);
    }

    #[test]
    fn test_unknown_and_missing_labels_are_counted() {
        let table = labels(&["Eligible", "Review", ""]);
        let summary = summarize(&table, "DebtEligibility").unwrap();
        assert_eq!(summary.count_of("Review"), 1);
        assert_eq!(summary.count_of(""), 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_empty_table() {
        let table = labels(&[]);
        let summary = summarize(&table, "DebtEligibility").unwrap();
        assert!(summary.entries.is_empty());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_missing_label_column() {
        let table = labels(&["Eligible"]);
        assert!(summarize(&table, "Status").is_err());
    }
}
