// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::month::fmt_amount;
use crate::series::{CategorySeries, MonthlySeries, build_monthly_series};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let snapshot = api.snapshot(None)?;
    let series = build_monthly_series(&snapshot.expenses, &snapshot.incomes, &snapshot.categories);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    if series.is_empty() {
        println!("No dated expenses or incomes yet.");
        return Ok(());
    }
    let only: Option<Vec<String>> = sub
        .get_many::<String>("category")
        .map(|v| v.cloned().collect());
    let (headers, rows) = table(&series, only.as_deref())?;
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}

/// One row per month: each category column, then total expenses and total
/// income. `only` narrows the category columns; totals always cover every
/// category.
pub fn table(
    series: &MonthlySeries,
    only: Option<&[String]>,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let columns: Vec<&CategorySeries> = match only {
        Some(names) => names
            .iter()
            .map(|n| {
                series
                    .category_totals_by_month
                    .iter()
                    .find(|c| c.category == *n)
                    .ok_or_else(|| anyhow!("Category '{}' not found", n))
            })
            .collect::<Result<_>>()?,
        None => series.category_totals_by_month.iter().collect(),
    };

    let mut headers = vec!["Month".to_string()];
    headers.extend(columns.iter().map(|c| c.category.clone()));
    headers.push("Total Expenses".into());
    headers.push("Total Income".into());

    let rows = series
        .month_labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = vec![label.clone()];
            for c in &columns {
                row.push(fmt_amount(c.totals[i]));
            }
            row.push(fmt_amount(series.total_expenses_by_month[i]));
            row.push(fmt_amount(series.total_income_by_month[i]));
            row
        })
        .collect();
    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense, Income};

    fn series() -> MonthlySeries {
        let cats = vec![
            Category {
                id: 1,
                name: "Food".into(),
                is_default: false,
            },
            Category {
                id: 2,
                name: "Rent".into(),
                is_default: false,
            },
        ];
        let exps = vec![
            Expense {
                category_id: Some(1),
                amount: Some("12.5".into()),
                occurred_on: Some("2025-07-04".into()),
                ..Default::default()
            },
            Expense {
                category_id: Some(2),
                amount: Some("1200".into()),
                occurred_on: Some("2025-08-01".into()),
                ..Default::default()
            },
        ];
        let incs = vec![Income {
            amount: Some("3000".into()),
            received_on: Some("2025-08-01".into()),
            ..Default::default()
        }];
        build_monthly_series(&exps, &incs, &cats)
    }

    #[test]
    fn rows_follow_month_order() {
        let (headers, rows) = table(&series(), None).unwrap();
        assert_eq!(
            headers,
            ["Month", "Food", "Rent", "Total Expenses", "Total Income"]
        );
        assert_eq!(rows[0], ["Jul 2025", "12.50", "0.00", "12.50", "0.00"]);
        assert_eq!(rows[1], ["Aug 2025", "0.00", "1200.00", "1200.00", "3000.00"]);
    }

    #[test]
    fn columns_follow_category_catalog() {
        let cats = vec![
            Category {
                id: 5,
                name: "Travel".into(),
                is_default: false,
            },
            Category {
                id: 1,
                name: "Auto".into(),
                is_default: false,
            },
        ];
        let exps = vec![Expense {
            category_id: Some(1),
            amount: Some("0.125".into()),
            occurred_on: Some("2025-03-01".into()),
            ..Default::default()
        }];
        let (headers, rows) = table(&build_monthly_series(&exps, &[], &cats), None).unwrap();
        assert_eq!(headers, ["Month", "Travel", "Auto", "Total Expenses", "Total Income"]);
        assert_eq!(rows[0], ["Mar 2025", "0.00", "0.13", "0.13", "0.00"]);
    }

    #[test]
    fn category_filter_keeps_full_totals() {
        let only = vec!["Rent".to_string()];
        let (headers, rows) = table(&series(), Some(&only)).unwrap();
        assert_eq!(headers, ["Month", "Rent", "Total Expenses", "Total Income"]);
        assert_eq!(rows[0], ["Jul 2025", "0.00", "12.50", "0.00"]);
        let missing = vec!["Travel".to_string()];
        assert!(table(&series(), Some(&missing)).is_err());
    }
}
