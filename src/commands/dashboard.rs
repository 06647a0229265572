// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{MonthSummary, aggregate_month};
use crate::api::ApiClient;
use crate::models::Snapshot;
use crate::month::YearMonth;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(s) => YearMonth::from_month_arg(s)?,
        None => YearMonth::current(),
    };
    let snapshot = api.snapshot(Some(month))?;
    let summary = summarize(&snapshot, month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        println!("{}:", month.long_label());
        println!("{}", pretty_table(&["Category", "Spent"], summary_rows(&summary)));
        println!("Total Spending: ${}", summary.grand_total);
        println!("Total Income:   ${}", summary.total_income);
    }
    Ok(())
}

pub fn summarize(snapshot: &Snapshot, month: YearMonth) -> MonthSummary {
    aggregate_month(
        &snapshot.expenses,
        &snapshot.categories,
        &snapshot.incomes,
        month,
    )
}

/// Table rows ordered by category name.
pub fn summary_rows(summary: &MonthSummary) -> Vec<Vec<String>> {
    summary
        .sorted_by_category()
        .into_iter()
        .map(|s| vec![s.category, format!("${}", s.total)])
        .collect()
}
