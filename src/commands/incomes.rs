// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::models::{Income, NewIncome, amount_value};
use crate::month::{YearMonth, fmt_amount};
use crate::utils::{maybe_print_json, parse_amount_arg, parse_date, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(api, sub)?,
        Some(("list", sub)) => list(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            api.delete_income(id)?;
            println!("Deleted income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let source = sub.get_one::<String>("source").unwrap().trim().to_string();
    let amount = parse_amount_arg(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?,
        None => chrono::Local::now().date_naive(),
    };
    let notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let created = api.create_income(&NewIncome {
        source,
        amount,
        received_on: date.to_string(),
        is_work_income: sub.get_flag("work"),
        notes,
    })?;
    println!(
        "Recorded income {} from '{}' on {}",
        fmt_amount(amount_value(created.amount.as_ref())),
        created.source,
        date
    );
    Ok(())
}

fn edit(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = api.income(id)?;
    let update = edited_income(&existing, sub)?;
    let saved = api.update_income(id, &update)?;
    println!(
        "Updated income {}: {} from '{}' on {}",
        id,
        fmt_amount(amount_value(saved.amount.as_ref())),
        saved.source,
        update.received_on
    );
    Ok(())
}

/// Full update body for `income edit`. `--notes ""` clears the notes.
pub fn edited_income(existing: &Income, sub: &clap::ArgMatches) -> Result<NewIncome> {
    let source = match sub.get_one::<String>("source") {
        Some(s) => s.trim().to_string(),
        None => existing.source.clone(),
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_amount_arg(a)?,
        None => amount_value(existing.amount.as_ref()).to_string(),
    };
    let received_on = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?.to_string(),
        None => existing
            .received_on
            .clone()
            .ok_or_else(|| anyhow!("Income {} has no date; pass --date", existing.id))?,
    };
    let is_work_income = if sub.get_flag("work") {
        true
    } else if sub.get_flag("not-work") {
        false
    } else {
        existing.is_work_income
    };
    let notes = match sub.get_one::<String>("notes") {
        Some(n) => Some(n.trim().to_string()).filter(|n| !n.is_empty()),
        None => existing.notes.clone(),
    };
    Ok(NewIncome {
        source,
        amount,
        received_on,
        is_work_income,
        notes,
    })
}

fn list(api: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| YearMonth::from_month_arg(s))
        .transpose()?;
    let data = income_rows(&api.incomes()?, month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.source.clone(),
                    r.amount.clone(),
                    if r.work { "yes".into() } else { String::new() },
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Source", "Amount", "Work", "Notes"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct IncomeRow {
    pub id: i64,
    pub date: String,
    pub source: String,
    pub amount: String,
    pub work: bool,
    pub notes: String,
}

/// Incomes newest first, optionally restricted to one month.
pub fn income_rows(incomes: &[Income], month: Option<YearMonth>) -> Vec<IncomeRow> {
    let mut picked: Vec<&Income> = incomes
        .iter()
        .filter(|i| {
            month.is_none_or(|m| i.received_on.as_deref().and_then(YearMonth::parse) == Some(m))
        })
        .collect();
    picked.sort_by(|a, b| {
        b.received_on
            .cmp(&a.received_on)
            .then_with(|| b.id.cmp(&a.id))
    });
    picked
        .into_iter()
        .map(|i| IncomeRow {
            id: i.id,
            date: i.received_on.clone().unwrap_or_default(),
            source: i.source.clone(),
            amount: fmt_amount(amount_value(i.amount.as_ref())),
            work: i.is_work_income,
            notes: i.notes.clone().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc(id: i64, amount: &str, received_on: Option<&str>) -> Income {
        Income {
            id,
            source: "Employer".into(),
            amount: Some(amount.into()),
            received_on: received_on.map(Into::into),
            ..Default::default()
        }
    }

    fn edit_matches(args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec!["moneytrail", "income", "edit", "7"];
        argv.extend_from_slice(args);
        let m = crate::cli::build_cli().get_matches_from(argv);
        let (_, income) = m.subcommand().unwrap();
        income.subcommand().unwrap().1.clone()
    }

    #[test]
    fn edit_keeps_unflagged_fields() {
        let mut existing = inc(7, "3000", Some("2025-07-01"));
        existing.is_work_income = true;
        existing.notes = Some("July pay".into());

        let update = edited_income(&existing, &edit_matches(&["--amount", "3100.50"])).unwrap();
        assert_eq!(update.amount, "3100.50");
        assert_eq!(update.source, "Employer");
        assert_eq!(update.received_on, "2025-07-01");
        assert!(update.is_work_income);
        assert_eq!(update.notes.as_deref(), Some("July pay"));

        let update =
            edited_income(&existing, &edit_matches(&["--not-work", "--notes", ""])).unwrap();
        assert!(!update.is_work_income);
        assert_eq!(update.notes, None);
        assert_eq!(update.amount, "3000");

        existing.received_on = None;
        assert!(edited_income(&existing, &edit_matches(&[])).is_err());
        assert!(edited_income(&existing, &edit_matches(&["--date", "2025-07-02"])).is_ok());
    }

    #[test]
    fn month_filter_drops_undated_incomes() {
        let incs = [
            inc(1, "3000", Some("2025-07-01")),
            inc(2, "12", None),
            inc(3, "50.5", Some("2025-07-20")),
            inc(4, "3200", Some("2025-08-01")),
        ];
        let rows = income_rows(&incs, YearMonth::new(2025, 7));
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 1]);
        assert_eq!(rows[0].amount, "50.50");
        assert_eq!(income_rows(&incs, None).len(), 4);
    }
}
