// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::categories::category_name;
use crate::debounce::Debouncer;
use crate::models::{Category, amount_value};
use crate::month::{YearMonth, fmt_amount, format_month_code};
use crate::review::{CategoryMarks, Mark, MarkField, MonthlyReview, sort_newest_first};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

const QUESTIONS: [&str; 3] = [
    "1) Did I exchange my life energy for a proportional amount of fulfillment, satisfaction, and value?",
    "2) Is this expenditure of life energy aligned with my values and life purpose?",
    "3) How might this pattern of spending change if I were financially independent (FI)?",
];

pub fn handle(api: Arc<ApiClient>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(&api, sub)?,
        Some(("start", sub)) => {
            let month = match sub.get_one::<String>("month") {
                Some(s) => YearMonth::from_month_arg(s)?,
                None => YearMonth::current(),
            };
            let review = api.start_review(month)?;
            println!(
                "Started review for {} (code {})",
                format_month_code(&review.month_code)?,
                review.month_code
            );
        }
        Some(("show", sub)) => show(&api, sub)?,
        Some(("notes", sub)) => {
            let review = fetch(&api, sub)?;
            let text = sub.get_one::<String>("text").unwrap();
            api.update_review(review.id, Some(text), None)?;
            println!("Notes saved");
        }
        Some(("complete", sub)) => {
            let review = fetch(&api, sub)?;
            if review.completed {
                println!("Review {} is already complete", review.month_code);
            } else {
                api.update_review(review.id, review.notes.as_deref(), Some(true))?;
                println!("Review {} marked complete", review.month_code);
            }
        }
        Some(("reopen", sub)) => {
            let review = fetch(&api, sub)?;
            if review.completed {
                api.update_review(review.id, review.notes.as_deref(), Some(false))?;
                println!("Review {} reopened", review.month_code);
            } else {
                println!("Review {} is already in progress", review.month_code);
            }
        }
        Some(("rebuild", sub)) => {
            let review = fetch(&api, sub)?;
            api.rebuild_review(review.id)?;
            println!("Review {} rebuilt", review.month_code);
        }
        Some(("mark", sub)) => mark(&api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn fetch(api: &ApiClient, sub: &clap::ArgMatches) -> Result<MonthlyReview> {
    let code = sub.get_one::<String>("month_code").unwrap().trim();
    api.review_by_month_code(code)
        .with_context(|| format!("Load review {}", code))
}

#[derive(Debug, Serialize)]
pub struct ReviewRow {
    pub month_code: String,
    pub month: String,
    pub completed: bool,
}

pub fn review_rows(mut reviews: Vec<MonthlyReview>) -> Vec<ReviewRow> {
    sort_newest_first(&mut reviews);
    reviews
        .into_iter()
        .map(|r| ReviewRow {
            month: format_month_code(&r.month_code).unwrap_or_else(|_| r.month_code.clone()),
            month_code: r.month_code,
            completed: r.completed,
        })
        .collect()
}

fn list(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let data = review_rows(api.monthly_reviews()?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No reviews to display");
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.month_code.clone(),
                r.month.clone(),
                if r.completed { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Code", "Month", "Completed"], rows));
    Ok(())
}

/// One row per category review item.
pub fn item_rows(review: &MonthlyReview, categories: &[Category]) -> Vec<Vec<String>> {
    review
        .monthly_category_reviews
        .iter()
        .map(|item| {
            let marks = item.marks();
            vec![
                item.id.to_string(),
                category_name(categories, item.category_id),
                fmt_amount(amount_value(item.total_spent.as_ref())),
                fmt_amount(amount_value(item.total_life_energy_hours.as_ref())),
                marks.received_fulfillment.to_string(),
                marks.aligned_with_values.to_string(),
                marks.would_change_post_fi.to_string(),
            ]
        })
        .collect()
}

fn show(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let review = fetch(api, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &review)? {
        return Ok(());
    }
    let categories = api.categories()?;
    let heading = review
        .month_start
        .clone()
        .unwrap_or_else(|| format_month_code(&review.month_code).unwrap_or_default());
    println!("Monthly Review: {}", heading);
    println!(
        "Total Income: ${}",
        fmt_amount(amount_value(review.total_income.as_ref()))
    );
    println!(
        "Total Expenses: ${}",
        fmt_amount(amount_value(review.total_expenses.as_ref()))
    );
    if let Some(user) = &review.user {
        println!(
            "Hourly Wage: ${}",
            fmt_amount(amount_value(user.hourly_wage.as_ref()))
        );
    }
    for q in QUESTIONS {
        println!("{}", q);
    }
    println!(
        "{}",
        pretty_table(
            &["Item", "Category", "Spent", "Life Energy Hours", "Fulfillment", "Aligned", "Post-FI"],
            item_rows(&review, &categories),
        )
    );
    if let Some(notes) = review.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("Notes: {}", notes);
    }
    println!("{}", if review.completed { "Completed" } else { "In progress" });
    Ok(())
}

fn mark(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let review = fetch(api, sub)?;
    let item_id = *sub.get_one::<i64>("item").unwrap();
    let field: MarkField = sub.get_one::<String>("field").unwrap().parse()?;
    let value: Mark = sub.get_one::<String>("mark").unwrap().parse()?;
    let item = review
        .monthly_category_reviews
        .iter()
        .find(|i| i.id == item_id)
        .ok_or_else(|| anyhow!("Item {} is not part of review {}", item_id, review.month_code))?;
    let mut marks = item.marks();
    marks.set(field, value);
    api.update_category_review(item_id, &marks)?;
    println!("Saved item {}", item_id);
    Ok(())
}

/// Apply one `<item> <field> <mark>` edit line to the current marks.
pub fn apply_edit(marks: &mut HashMap<i64, CategoryMarks>, line: &str) -> Result<(i64, CategoryMarks)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [item, field, value] = parts.as_slice() else {
        return Err(anyhow!("Expected '<item> <field> <mark>', got '{}'", line.trim()));
    };
    let item_id: i64 = item
        .parse()
        .with_context(|| format!("Invalid item id '{}'", item))?;
    let field: MarkField = field.parse()?;
    let value: Mark = value.parse()?;
    let current = marks
        .get_mut(&item_id)
        .ok_or_else(|| anyhow!("Item {} is not part of this review", item_id))?;
    current.set(field, value);
    Ok((item_id, *current))
}

/// Line-based editor. Every accepted edit schedules a save for its item;
/// a further edit to the same item within the quiet interval replaces it.
fn edit(api: Arc<ApiClient>, sub: &clap::ArgMatches) -> Result<()> {
    let review = fetch(&api, sub)?;
    let quiet = Duration::from_millis(*sub.get_one::<u64>("quiet-ms").unwrap());
    let categories = api.categories()?;

    println!(
        "{}",
        pretty_table(
            &["Item", "Category", "Spent", "Life Energy Hours", "Fulfillment", "Aligned", "Post-FI"],
            item_rows(&review, &categories),
        )
    );
    println!("Enter '<item> <fulfillment|aligned|post-fi> <-|0|+>' per line; 'done' to finish.");

    let mut marks: HashMap<i64, CategoryMarks> = review
        .monthly_category_reviews
        .iter()
        .map(|i| (i.id, i.marks()))
        .collect();
    let mut savers: HashMap<i64, Debouncer<CategoryMarks>> = HashMap::new();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "done" || trimmed == "quit" {
            break;
        }
        match apply_edit(&mut marks, trimmed) {
            Ok((item_id, updated)) => {
                let saver = savers.entry(item_id).or_insert_with(|| {
                    let api = Arc::clone(&api);
                    Debouncer::new(quiet, move |m: CategoryMarks| {
                        match api.update_category_review(item_id, &m) {
                            Ok(()) => tracing::info!(item = item_id, "auto-saved"),
                            Err(e) => {
                                tracing::warn!(item = item_id, error = %e, "auto-save failed");
                                eprintln!("Auto-save failed for item {}: {}", item_id, e);
                            }
                        }
                    })
                });
                saver.schedule(updated);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    // Dropping the savers flushes any edit still waiting for its quiet interval.
    drop(savers);
    println!("All changes saved");
    Ok(())
}
