//! Balance-column suggestions.
//!
//! A column is a candidate when its name does not look like an identifier,
//! date or text field and enough of its values parse as numbers. The keyword
//! list and ratio threshold are empirical and can be overridden through
//! [`GuesserSettings`].

use crate::domain::model::{Column, Table};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "member", "route", "name", "date", "month", "year", "id", "clerk", "zone",
];

pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuesserSettings {
    pub exclude_keywords: Vec<String>,
    pub numeric_threshold: f64,
}

impl Default for GuesserSettings {
    fn default() -> Self {
        Self {
            exclude_keywords: DEFAULT_EXCLUDE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnGuesser {
    settings: GuesserSettings,
}

impl ColumnGuesser {
    pub fn new(settings: GuesserSettings) -> Self {
        let exclude_keywords = settings
            .exclude_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
        Self {
            settings: GuesserSettings {
                exclude_keywords,
                numeric_threshold: settings.numeric_threshold,
            },
        }
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.settings
            .exclude_keywords
            .iter()
            .any(|k| lowered.contains(k.as_str()))
    }

    /// Candidate balance columns in table order. Falls back to every column
    /// when nothing qualifies.
    pub fn guess(&self, table: &Table) -> Vec<String> {
        let candidates: Vec<String> = table
            .columns()
            .iter()
            .filter(|column| !self.is_excluded_name(column.name()))
            .filter(|column| {
                let ratio = numeric_ratio(column);
                tracing::debug!("Column '{}' numeric ratio {:.2}", column.name(), ratio);
                ratio > self.settings.numeric_threshold
            })
            .map(|column| column.name().to_string())
            .collect();

        if candidates.is_empty() {
            tracing::warn!("No balance-like columns found, offering all columns");
            return table
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
        }

        candidates
    }
}

/// Share of values that parse as numbers. Zero for an empty column.
pub fn numeric_ratio(column: &Column) -> f64 {
    if column.is_empty() {
        return 0.0;
    }
    let numeric = column
        .values()
        .iter()
        .filter(|v| v.as_number().is_some())
        .count();
    numeric as f64 / column.len() as f64
}

pub fn guess_balance_columns(table: &Table) -> Vec<String> {
    ColumnGuesser::default().guess(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Value;

    fn column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::from_raw(v)).collect())
    }

    fn ten_rows(numeric: usize) -> Vec<&'static str> {
        (0..10).map(|i| if i < numeric { "10" } else { "n/a text" }).collect()
    }

    #[test]
    fn test_member_column_excluded_despite_numbers() {
        let table = Table::from_columns(vec![
            column("Member_No", &["1", "2", "3"]),
            column("Nov_Balance", &["10", "20", "30"]),
        ])
        .unwrap();

        assert_eq!(guess_balance_columns(&table), vec!["Nov_Balance"]);
    }

    #[test]
    fn test_eighty_percent_numeric_included() {
        let table = Table::from_columns(vec![
            column("Nov_Balance", &ten_rows(8)),
            column("Notes", &ten_rows(2)),
        ])
        .unwrap();

        assert_eq!(guess_balance_columns(&table), vec!["Nov_Balance"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let table = Table::from_columns(vec![
            column("Exactly", &ten_rows(3)),
            column("Above", &ten_rows(4)),
        ])
        .unwrap();

        assert_eq!(guess_balance_columns(&table), vec!["Above"]);
    }

    #[test]
    fn test_fallback_to_all_columns() {
        let table = Table::from_columns(vec![
            column("Member_No", &["1"]),
            column("Route", &["A"]),
            column("Date", &["2024-01-01"]),
        ])
        .unwrap();

        assert_eq!(
            guess_balance_columns(&table),
            vec!["Member_No", "Route", "Date"]
        );
    }

    #[test]
    fn test_keyword_match_is_substring_and_case_insensitive() {
        let guesser = ColumnGuesser::default();
        assert!(guesser.is_excluded_name("PAID_AMOUNT"));
        assert!(guesser.is_excluded_name("Customer NAME"));
        assert!(guesser.is_excluded_name("Monthly"));
        assert!(!guesser.is_excluded_name("Dec Balance"));
    }

    #[test]
    fn test_keeps_table_order() {
        let table = Table::from_columns(vec![
            column("Jan", &["1"]),
            column("Route", &["A"]),
            column("Nov", &["3"]),
            column("Dec", &["2"]),
        ])
        .unwrap();

        assert_eq!(guess_balance_columns(&table), vec!["Jan", "Nov", "Dec"]);
    }

    #[test]
    fn test_custom_settings() {
        let guesser = ColumnGuesser::new(GuesserSettings {
            exclude_keywords: vec!["JAN".to_string()],
            numeric_threshold: 0.0,
        });
        let table = Table::from_columns(vec![
            column("Jan", &["1"]),
            column("Member", &["5"]),
        ])
        .unwrap();

        // "Member" is only excluded by the default list
        assert_eq!(guesser.guess(&table), vec!["Member"]);
    }

    #[test]
    fn test_empty_table_falls_back() {
        let table = Table::from_columns(vec![column("Nov", &[]), column("Dec", &[])]).unwrap();
        assert_eq!(numeric_ratio(table.column("Nov").unwrap()), 0.0);
        assert_eq!(guess_balance_columns(&table), vec!["Nov", "Dec"]);
    }
}
