// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::categories::{category_name, id_for_category};
use crate::models::{Category, Expense, NewExpense, amount_value};
use crate::month::{YearMonth, fmt_amount};
use crate::utils::{maybe_print_json, parse_amount_arg, parse_date, pretty_table};
use anyhow::{Result, anyhow};
use regex::Regex;
use serde::Serialize;

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, sub)?,
        Some(("list", sub)) => list(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            api.delete_expense(id)?;
            println!("Deleted expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let amount = parse_amount_arg(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?,
        None => chrono::Local::now().date_naive(),
    };
    let cats = api.categories()?;
    let category_id = id_for_category(&cats, category)?;
    let created = api.create_expense(&NewExpense {
        description,
        amount,
        category_id,
        occurred_on: date.to_string(),
    })?;
    println!(
        "Recorded {} on {} for '{}' ({})",
        fmt_amount(amount_value(created.amount.as_ref())),
        date,
        created.description,
        category
    );
    Ok(())
}

fn edit(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = api.expense(id)?;
    let cats = api.categories()?;
    let update = edited_expense(&existing, &cats, sub)?;
    let saved = api.update_expense(id, &update)?;
    println!(
        "Updated expense {}: {} on {} for '{}' ({})",
        id,
        fmt_amount(amount_value(saved.amount.as_ref())),
        update.occurred_on,
        saved.description,
        category_name(&cats, Some(update.category_id))
    );
    Ok(())
}

/// Full update body for `expense edit`: each flag given replaces the stored
/// value, everything else is sent back unchanged.
pub fn edited_expense(
    existing: &Expense,
    categories: &[Category],
    sub: &clap::ArgMatches,
) -> Result<NewExpense> {
    let description = match sub.get_one::<String>("description") {
        Some(d) => d.trim().to_string(),
        None => existing.description.clone(),
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_amount_arg(a)?,
        None => amount_value(existing.amount.as_ref()).to_string(),
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => id_for_category(categories, c)?,
        None => existing
            .category_id
            .ok_or_else(|| anyhow!("Expense {} has no category; pass --category", existing.id))?,
    };
    let occurred_on = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?.to_string(),
        None => existing
            .occurred_on
            .clone()
            .ok_or_else(|| anyhow!("Expense {} has no date; pass --date", existing.id))?,
    };
    Ok(NewExpense {
        description,
        amount,
        category_id,
        occurred_on,
    })
}

fn list(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| YearMonth::from_month_arg(s))
        .transpose()?;
    let cats = api.categories()?;
    let expenses = api.expenses(month)?;
    let data = query_rows(&cats, &expenses, sub)?;
    print_rows(&data, sub)
}

#[derive(Debug, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

/// Expense rows for `expense list`, newest first, after the month,
/// category, description-pattern and limit filters in `sub`.
pub fn query_rows(
    categories: &[Category],
    expenses: &[Expense],
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| YearMonth::from_month_arg(s))
        .transpose()?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(categories, c))
        .transpose()?;
    let pattern = sub
        .get_one::<String>("match")
        .map(|p| Regex::new(p.trim()).map_err(|err| anyhow!("Invalid regex pattern '{}': {}", p, err)))
        .transpose()?;

    let mut picked: Vec<&Expense> = expenses
        .iter()
        .filter(|e| {
            month.is_none_or(|m| e.occurred_on.as_deref().and_then(YearMonth::parse) == Some(m))
        })
        .filter(|e| category_id.is_none() || e.category_id == category_id)
        .filter(|e| pattern.as_ref().is_none_or(|re| re.is_match(&e.description)))
        .collect();
    picked.sort_by(|a, b| {
        b.occurred_on
            .cmp(&a.occurred_on)
            .then_with(|| b.id.cmp(&a.id))
    });
    if let Some(limit) = sub.get_one::<usize>("limit") {
        picked.truncate(*limit);
    }

    Ok(picked.into_iter().map(|e| expense_row(categories, e)).collect())
}

fn expense_row(categories: &[Category], e: &Expense) -> ExpenseRow {
    ExpenseRow {
        id: e.id,
        date: e.occurred_on.clone().unwrap_or_default(),
        description: e.description.clone(),
        amount: fmt_amount(amount_value(e.amount.as_ref())),
        category: category_name(categories, e.category_id),
    }
}

/// One category's expenses in `month`, oldest first.
pub fn category_month_rows(
    categories: &[Category],
    expenses: &[Expense],
    category_id: i64,
    month: YearMonth,
) -> Vec<ExpenseRow> {
    let mut picked: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.category_id == Some(category_id))
        .filter(|e| e.occurred_on.as_deref().and_then(YearMonth::parse) == Some(month))
        .collect();
    picked.sort_by(|a, b| a.occurred_on.cmp(&b.occurred_on).then_with(|| a.id.cmp(&b.id)));
    picked.into_iter().map(|e| expense_row(categories, e)).collect()
}

/// Print expense rows as a table, or as JSON when asked.
pub fn print_rows(data: &[ExpenseRow], sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.description.clone(),
                r.amount.clone(),
                r.category.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Description", "Amount", "Category"], rows)
    );
    Ok(())
}
