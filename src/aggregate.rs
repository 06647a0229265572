// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Single-month dashboard aggregation.

use crate::models::{Category, Expense, Income, amount_value};
use crate::month::{YearMonth, fmt_amount};
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySubtotal {
    pub category: String,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub category_subtotals: Vec<CategorySubtotal>,
    pub grand_total: String,
    pub total_income: String,
}

impl MonthSummary {
    /// Subtotals ordered by category name, ignoring case.
    pub fn sorted_by_category(&self) -> Vec<CategorySubtotal> {
        let mut out = self.category_subtotals.clone();
        out.sort_by_key(|s| s.category.to_lowercase());
        out
    }
}

fn in_month(date: Option<&str>, target: YearMonth) -> bool {
    match date.and_then(YearMonth::parse) {
        Some(m) => m == target,
        None => {
            tracing::debug!(?date, "skipping record with malformed date");
            false
        }
    }
}

/// Spending per category, total spending and total income for `target`.
///
/// Every known category is reported, with `0.00` when nothing was spent.
/// An expense pointing at an unknown category still counts towards the
/// grand total. Records without a usable date are ignored.
pub fn aggregate_month(
    expenses: &[Expense],
    categories: &[Category],
    incomes: &[Income],
    target: YearMonth,
) -> MonthSummary {
    let mut subtotals: BTreeMap<i64, f64> = categories.iter().map(|c| (c.id, 0.0)).collect();
    let mut grand_total = 0.0;

    for exp in expenses {
        if !in_month(exp.occurred_on.as_deref(), target) {
            continue;
        }
        let amt = amount_value(exp.amount.as_ref());
        match exp.category_id.and_then(|id| subtotals.get_mut(&id)) {
            Some(slot) => *slot += amt,
            None => tracing::debug!(
                expense = exp.id,
                category = ?exp.category_id,
                "expense has no matching category"
            ),
        }
        grand_total += amt;
    }

    let total_income: f64 = incomes
        .iter()
        .filter(|inc| in_month(inc.received_on.as_deref(), target))
        .map(|inc| amount_value(inc.amount.as_ref()))
        .sum();

    let category_subtotals = subtotals
        .into_iter()
        .map(|(id, total)| {
            let name = categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
            CategorySubtotal {
                category: name,
                total: fmt_amount(total),
            }
        })
        .collect();

    MonthSummary {
        month: target,
        category_subtotals,
        grand_total: fmt_amount(grand_total),
        total_income: fmt_amount(total_income),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.into(),
            is_default: false,
        }
    }

    fn exp(category_id: i64, amount: &str, occurred_on: &str) -> Expense {
        Expense {
            category_id: Some(category_id),
            amount: Some(amount.into()),
            occurred_on: Some(occurred_on.into()),
            ..Default::default()
        }
    }

    fn inc(amount: &str, received_on: Option<&str>) -> Income {
        Income {
            amount: Some(amount.into()),
            received_on: received_on.map(Into::into),
            ..Default::default()
        }
    }

    fn july() -> YearMonth {
        YearMonth::new(2025, 7).unwrap()
    }

    #[test]
    fn zero_fills_every_category() {
        let cats = [cat(1, "Food"), cat(2, "Rent")];
        let s = aggregate_month(&[], &cats, &[], july());
        assert_eq!(
            s.category_subtotals,
            vec![
                CategorySubtotal {
                    category: "Food".into(),
                    total: "0.00".into()
                },
                CategorySubtotal {
                    category: "Rent".into(),
                    total: "0.00".into()
                },
            ]
        );
        assert_eq!(s.grand_total, "0.00");
        assert_eq!(s.total_income, "0.00");
    }

    #[test]
    fn only_target_month_counts() {
        let cats = [cat(1, "Food")];
        let exps = [exp(1, "50", "2025-07-15"), exp(1, "999", "2025-08-01")];
        let s = aggregate_month(&exps, &cats, &[], july());
        assert_eq!(s.grand_total, "50.00");
        assert_eq!(s.category_subtotals[0].total, "50.00");
    }

    #[test]
    fn unparseable_amount_counts_as_zero() {
        let cats = [cat(1, "Food")];
        let exps = [exp(1, "not-a-number", "2025-07-02"), exp(1, "4.5", "2025-07-03")];
        let s = aggregate_month(&exps, &cats, &[], july());
        assert_eq!(s.category_subtotals[0].total, "4.50");
        assert_eq!(s.grand_total, "4.50");
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let cats = [cat(1, "Food")];
        let mut no_date = exp(1, "10", "");
        no_date.occurred_on = None;
        let exps = [no_date, exp(1, "20", "2025"), exp(1, "30", "garbage")];
        let incs = [inc("100", None), inc("200", Some("07/2025")), inc("5", Some("2025-07-31"))];
        let s = aggregate_month(&exps, &cats, &incs, july());
        assert_eq!(s.grand_total, "0.00");
        assert_eq!(s.total_income, "5.00");
    }

    #[test]
    fn orphaned_expense_counts_only_in_grand_total() {
        let cats = [cat(1, "Food")];
        let exps = [exp(1, "10", "2025-07-01"), exp(42, "5", "2025-07-01")];
        let s = aggregate_month(&exps, &cats, &[], july());
        assert_eq!(s.category_subtotals.len(), 1);
        assert_eq!(s.category_subtotals[0].total, "10.00");
        assert_eq!(s.grand_total, "15.00");
    }

    #[test]
    fn income_sums_target_month() {
        let incs = [
            inc("3000", Some("2025-07-01")),
            inc("150.25", Some("2025-07-20")),
            inc("3200", Some("2025-08-01")),
        ];
        let s = aggregate_month(&[], &[], &incs, july());
        assert_eq!(s.total_income, "3150.25");
        assert!(s.category_subtotals.is_empty());
    }

    #[test]
    fn same_input_same_output() {
        let cats = [cat(2, "Rent"), cat(1, "Food")];
        let exps = [exp(1, "12.345", "2025-07-01"), exp(2, "800", "2025-07-01")];
        let incs = [inc("900", Some("2025-07-02"))];
        let a = aggregate_month(&exps, &cats, &incs, july());
        let b = aggregate_month(&exps, &cats, &incs, july());
        assert_eq!(a, b);
    }

    #[test]
    fn display_order_is_case_insensitive_by_name() {
        let cats = [cat(1, "rent"), cat(2, "Books"), cat(3, "coffee")];
        let s = aggregate_month(&[], &cats, &[], july());
        let names: Vec<_> = s
            .sorted_by_category()
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, ["Books", "coffee", "rent"]);
        // Raw output follows category id order.
        assert_eq!(s.category_subtotals[0].category, "rent");
    }
}
