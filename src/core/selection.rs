use crate::core::guesser::ColumnGuesser;
use crate::domain::model::{ColumnSelection, Table, ELIGIBILITY_COLUMN, REASON_COLUMN};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_distinct, validate_exact_len};

const MEMBER_NAMES: &[&str] = &["memberno", "member_no", "membernumber"];

pub fn guess_member_column(table: &Table) -> Option<String> {
    let names = table.column_names();
    names
        .iter()
        .find(|name| {
            let normalized = name.to_lowercase().replace(' ', "");
            MEMBER_NAMES.contains(&normalized.as_str())
        })
        .or_else(|| names.first())
        .map(|name| name.to_string())
}

pub fn guess_route_column(table: &Table) -> Option<String> {
    let names = table.column_names();
    names
        .iter()
        .find(|name| name.to_lowercase().contains("route"))
        .or_else(|| names.get(1).or_else(|| names.first()))
        .map(|name| name.to_string())
}

/// Preselects month 1..3 from the candidate list.
///
/// Slot `i` prefers `candidates[i]`, then the table's column at `i` (clamped
/// to the last column). A preference that is not a candidate falls back to
/// the first candidate, which may leave duplicates for the user to resolve.
pub fn default_balance_selection(table: &Table, candidates: &[String]) -> Option<[String; 3]> {
    let all = table.column_names();
    let first = candidates.first()?;
    let last = all.len().checked_sub(1)?;

    let pick = |slot: usize| -> String {
        let preferred = candidates
            .get(slot)
            .map(String::as_str)
            .unwrap_or(all[slot.min(last)]);
        if candidates.iter().any(|c| c == preferred) {
            preferred.to_string()
        } else {
            first.clone()
        }
    };

    Some([pick(0), pick(1), pick(2)])
}

impl ColumnSelection {
    /// Fills the roles the caller did not pin down with guesses.
    pub fn resolve(
        table: &Table,
        member: Option<&str>,
        route: Option<&str>,
        balances: &[String],
        guesser: &ColumnGuesser,
    ) -> Result<Self> {
        if table.column_count() == 0 {
            return Err(EtlError::EmptyTable);
        }

        let member = match member {
            Some(name) => name.to_string(),
            None => guess_member_column(table).ok_or(EtlError::EmptyTable)?,
        };
        let route = match route {
            Some(name) => name.to_string(),
            None => guess_route_column(table).ok_or(EtlError::EmptyTable)?,
        };

        let balances = if balances.is_empty() {
            let candidates = guesser.guess(table);
            tracing::info!("💡 Balance column candidates: {}", candidates.join(", "));
            default_balance_selection(table, &candidates).ok_or(EtlError::EmptyTable)?
        } else {
            validate_exact_len("months", balances, 3)?;
            [
                balances[0].clone(),
                balances[1].clone(),
                balances[2].clone(),
            ]
        };

        Ok(Self {
            member,
            route,
            balances,
        })
    }

    /// Every role must name an existing column and the three balance
    /// columns must be pairwise different.
    pub fn validate(&self, table: &Table) -> Result<()> {
        table.require_column(&self.member)?;
        table.require_column(&self.route)?;
        for balance in &self.balances {
            table.require_column(balance)?;
        }
        validate_distinct(&self.balances)
    }
}

/// Narrows a classified table to the columns worth exporting.
pub fn project_results(classified: &Table, selection: &ColumnSelection) -> Result<Table> {
    let wanted = [
        selection.member.as_str(),
        selection.route.as_str(),
        selection.balances[0].as_str(),
        selection.balances[1].as_str(),
        selection.balances[2].as_str(),
        ELIGIBILITY_COLUMN,
        REASON_COLUMN,
    ];

    let mut names: Vec<&str> = Vec::with_capacity(wanted.len());
    for name in wanted {
        if classified.has_column(name) && !names.contains(&name) {
            names.push(name);
        }
    }

    classified.select(&names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Column, Value};

    fn table(names: &[&str]) -> Table {
        Table::from_columns(
            names
                .iter()
                .map(|n| Column::new(*n, vec![Value::from("1")]))
                .collect(),
        )
        .unwrap()
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_guess_member_column() {
        let t = table(&["Route", "Member No", "Nov"]);
        assert_eq!(guess_member_column(&t).as_deref(), Some("Member No"));

        let t = table(&["Account", "Route"]);
        assert_eq!(guess_member_column(&t).as_deref(), Some("Account"));
    }

    #[test]
    fn test_guess_route_column() {
        let t = table(&["Member_No", "Zone", "Delivery Route"]);
        assert_eq!(guess_route_column(&t).as_deref(), Some("Delivery Route"));

        let t = table(&["Member_No", "Zone"]);
        assert_eq!(guess_route_column(&t).as_deref(), Some("Zone"));

        let t = table(&["Member_No"]);
        assert_eq!(guess_route_column(&t).as_deref(), Some("Member_No"));
    }

    #[test]
    fn test_default_balance_selection_uses_first_three_candidates() {
        let t = table(&["Member_No", "Route", "Nov", "Dec", "Jan", "Feb"]);
        let candidates = strings(&["Nov", "Dec", "Jan", "Feb"]);
        assert_eq!(
            default_balance_selection(&t, &candidates).unwrap(),
            ["Nov".to_string(), "Dec".to_string(), "Jan".to_string()]
        );
    }

    #[test]
    fn test_default_balance_selection_with_too_few_candidates() {
        let t = table(&["Member_No", "Nov", "Dec"]);
        let candidates = strings(&["Nov", "Dec"]);
        // slot 3 prefers the third table column, which is a candidate
        assert_eq!(
            default_balance_selection(&t, &candidates).unwrap(),
            ["Nov".to_string(), "Dec".to_string(), "Dec".to_string()]
        );

        let t = table(&["Nov", "Member_No", "Route"]);
        let candidates = strings(&["Nov"]);
        assert_eq!(
            default_balance_selection(&t, &candidates).unwrap(),
            ["Nov".to_string(), "Nov".to_string(), "Nov".to_string()]
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_columns() {
        let t = table(&["Member_No", "Route", "Nov", "Dec", "Jan"]);
        let selection = ColumnSelection::resolve(
            &t,
            Some("Route"),
            None,
            &strings(&["Jan", "Dec", "Nov"]),
            &ColumnGuesser::default(),
        )
        .unwrap();

        assert_eq!(selection.member, "Route");
        assert_eq!(selection.route, "Route");
        assert_eq!(selection.balances, ["Jan", "Dec", "Nov"].map(String::from));
    }

    #[test]
    fn test_resolve_rejects_wrong_month_count() {
        let t = table(&["Nov", "Dec"]);
        let err = ColumnSelection::resolve(
            &t,
            None,
            None,
            &strings(&["Nov", "Dec"]),
            &ColumnGuesser::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_validate_reports_missing_and_duplicate() {
        let t = table(&["Member_No", "Route", "Nov", "Dec", "Jan"]);
        let mut selection = ColumnSelection {
            member: "Member_No".to_string(),
            route: "Route".to_string(),
            balances: ["Nov", "Dec", "Jan"].map(String::from),
        };
        assert!(selection.validate(&t).is_ok());

        selection.balances[2] = "Nov".to_string();
        assert!(matches!(
            selection.validate(&t),
            Err(EtlError::DuplicateColumnSelection { .. })
        ));

        selection.route = "Zone".to_string();
        assert!(matches!(
            selection.validate(&t),
            Err(EtlError::ColumnNotFound { column }) if column == "Zone"
        ));
    }

    #[test]
    fn test_project_results_order_and_dedup() {
        let t = table(&["Extra", "Nov", "Member_No", "Dec", "Jan", "DebtEligibility", "Reason"]);
        let selection = ColumnSelection {
            member: "Member_No".to_string(),
            route: "Member_No".to_string(),
            balances: ["Nov", "Dec", "Jan"].map(String::from),
        };

        let projected = project_results(&t, &selection).unwrap();
        assert_eq!(
            projected.column_names(),
            vec!["Member_No", "Nov", "Dec", "Jan", "DebtEligibility", "Reason"]
        );
    }
}
