// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Multi-month "wall chart" series.

use crate::models::{Category, Expense, Income, amount_value};
use crate::month::YearMonth;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Per-month totals of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category: String,
    pub totals: Vec<f64>,
}

/// Parallel per-month arrays covering every month between the earliest and
/// latest dated record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub month_labels: Vec<String>,
    #[serde(skip)]
    pub months: Vec<YearMonth>,
    /// In category catalog order; serialized as a name -> totals object.
    #[serde(serialize_with = "as_map")]
    pub category_totals_by_month: Vec<CategorySeries>,
    pub total_expenses_by_month: Vec<f64>,
    pub total_income_by_month: Vec<f64>,
}

fn as_map<S: Serializer>(series: &[CategorySeries], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(series.iter().map(|c| (&c.category, &c.totals)))
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&[f64]> {
        self.category_totals_by_month
            .iter()
            .find(|c| c.category == name)
            .map(|c| c.totals.as_slice())
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.category_totals_by_month
            .iter()
            .map(|c| c.category.as_str())
    }
}

/// Build the wall chart series from the full expense and income history.
///
/// Expenses whose category is unknown are left out of both the category
/// series and the expense totals, although their dates still widen the
/// month range.
pub fn build_monthly_series(
    expenses: &[Expense],
    incomes: &[Income],
    categories: &[Category],
) -> MonthlySeries {
    let expense_months: Vec<Option<YearMonth>> = expenses
        .iter()
        .map(|e| e.occurred_on.as_deref().and_then(YearMonth::parse))
        .collect();
    let income_months: Vec<Option<YearMonth>> = incomes
        .iter()
        .map(|i| i.received_on.as_deref().and_then(YearMonth::parse))
        .collect();

    let mut dated = expense_months.iter().chain(&income_months).flatten();
    let Some(first) = dated.next().copied() else {
        return MonthlySeries::default();
    };
    let (min, max) = dated.fold((first, first), |(lo, hi), m| (lo.min(*m), hi.max(*m)));

    let months = YearMonth::range_inclusive(min, max);
    let index: HashMap<YearMonth, usize> =
        months.iter().enumerate().map(|(i, m)| (*m, i)).collect();

    // Categories sharing a name share one series, placed where the name first appears.
    let mut by_category: Vec<CategorySeries> = Vec::new();
    let mut slot_of_name: HashMap<&str, usize> = HashMap::new();
    for c in categories {
        slot_of_name.entry(c.name.as_str()).or_insert_with(|| {
            by_category.push(CategorySeries {
                category: c.name.clone(),
                totals: vec![0.0; months.len()],
            });
            by_category.len() - 1
        });
    }

    for (exp, month) in expenses.iter().zip(&expense_months) {
        let Some(cat) = categories.iter().find(|c| Some(c.id) == exp.category_id) else {
            tracing::debug!(expense = exp.id, "dropping expense without a known category");
            continue;
        };
        let Some(idx) = month.and_then(|m| index.get(&m).copied()) else {
            continue;
        };
        if let Some(&slot) = slot_of_name.get(cat.name.as_str()) {
            by_category[slot].totals[idx] += amount_value(exp.amount.as_ref());
        }
    }

    let total_expenses_by_month = (0..months.len())
        .map(|i| by_category.iter().map(|c| c.totals[i]).sum::<f64>())
        .collect();

    let mut total_income_by_month = vec![0.0; months.len()];
    for (inc, month) in incomes.iter().zip(&income_months) {
        if let Some(idx) = month.and_then(|m| index.get(&m).copied()) {
            total_income_by_month[idx] += amount_value(inc.amount.as_ref());
        }
    }

    MonthlySeries {
        month_labels: months.iter().map(|m| m.label()).collect(),
        months,
        category_totals_by_month: by_category,
        total_expenses_by_month,
        total_income_by_month,
    }
}
