use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub const ELIGIBILITY_COLUMN: &str = "DebtEligibility";
pub const REASON_COLUMN: &str = "Reason";
pub const COUNT_COLUMN: &str = "Count";

/// A single cell as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
}

impl Value {
    /// Markers that spreadsheet exports commonly use for an empty cell.
    pub const NULL_MARKERS: &'static [&'static str] =
        &["NA", "N/A", "null", "NULL", "None", "NaN", "nan", "#N/A"];

    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || Self::NULL_MARKERS.contains(&trimmed) {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parses the cell as a number. `None` for nulls, unparsable text and NaN.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Value::Null => return None,
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (!number.is_nan()).then_some(number)
    }

    /// Total coercion: anything that is not a number counts as zero.
    pub fn coerce_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, uniquely named columns over positionally aligned rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(EtlError::ProcessingError {
                    message: format!("Duplicate column name '{}'", column.name()),
                });
            }
        }

        if let Some(first) = columns.first() {
            if let Some(misaligned) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(EtlError::ProcessingError {
                    message: format!(
                        "Column '{}' has {} rows, expected {}",
                        misaligned.name(),
                        misaligned.len(),
                        first.len()
                    ),
                });
            }
        }

        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| EtlError::ColumnNotFound {
            column: name.to_string(),
        })
    }

    /// Returns a copy with `name` set to `values`. An existing column of that
    /// name keeps its position; otherwise the column is appended.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table> {
        if !self.columns.is_empty() && values.len() != self.row_count() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    self.row_count()
                ),
            });
        }

        let mut columns = self.columns.clone();
        let column = Column::new(name, values);
        match columns.iter_mut().find(|c| c.name() == name) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        Ok(Table { columns })
    }

    /// Projects the named columns in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| self.require_column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Table::from_columns(columns)
    }

    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values()[index]).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EligibilityLabel {
    Eligible,
    Ineligible,
    Dormant,
}

impl EligibilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityLabel::Eligible => "Eligible",
            EligibilityLabel::Ineligible => "Ineligible",
            EligibilityLabel::Dormant => "Dormant",
        }
    }
}

impl fmt::Display for EligibilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub eligibility: EligibilityLabel,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub label: String,
    pub count: usize,
}

/// Row counts per label, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map_or(0, |e| e.count)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// The two-column `DebtEligibility, Count` sheet.
    pub fn to_table(&self) -> Result<Table> {
        let labels = self
            .entries
            .iter()
            .map(|e| Value::Text(e.label.clone()))
            .collect();
        let counts = self
            .entries
            .iter()
            .map(|e| Value::Number(e.count as f64))
            .collect();
        Table::from_columns(vec![
            Column::new(ELIGIBILITY_COLUMN, labels),
            Column::new(COUNT_COLUMN, counts),
        ])
    }
}

/// Which columns play which role in a classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    pub member: String,
    pub route: String,
    pub balances: [String; 3],
}

/// Everything the load phase needs from one classification run.
#[derive(Debug, Clone)]
pub struct EligibilityRun {
    pub source: String,
    pub selection: ColumnSelection,
    pub results: Table,
    pub summary: Summary,
}
