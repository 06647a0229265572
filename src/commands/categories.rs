// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::expenses::{category_month_rows, print_rows};
use crate::models::Category;
use crate::month::YearMonth;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let cat = api.create_category(name, sub.get_flag("default"))?;
            println!("Added category '{}' (id {})", cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let mut cats = api.categories()?;
            cats.sort_by_key(|c| c.name.to_lowercase());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            if c.is_default { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Default"], data));
            }
        }
        Some(("expenses", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let month = match sub.get_one::<String>("month") {
                Some(s) => YearMonth::from_month_arg(s)?,
                None => YearMonth::current(),
            };
            let cats = api.categories()?;
            let id = id_for_category(&cats, name)?;
            let rows = category_month_rows(&cats, &api.expenses(Some(month))?, id, month);
            if rows.is_empty() && !sub.get_flag("json") && !sub.get_flag("jsonl") {
                println!("No expenses for '{}' in {}", name.trim(), month.long_label());
            } else {
                print_rows(&rows, sub)?;
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let cats = api.categories()?;
            let id = id_for_category(&cats, name)?;
            api.delete_category(id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

/// Resolve a category by name, preferring an exact match over a
/// case-insensitive one.
pub fn id_for_category(categories: &[Category], name: &str) -> Result<i64> {
    let name = name.trim();
    categories
        .iter()
        .find(|c| c.name == name)
        .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Category '{}' not found", name))
}

pub fn category_name(categories: &[Category], id: Option<i64>) -> String {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| crate::aggregate::UNKNOWN_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Food".into(),
                is_default: true,
            },
            Category {
                id: 2,
                name: "food".into(),
                is_default: false,
            },
            Category {
                id: 3,
                name: "Rent".into(),
                is_default: false,
            },
        ]
    }

    #[test]
    fn exact_name_wins_over_case_insensitive() {
        assert_eq!(id_for_category(&cats(), "food").unwrap(), 2);
        assert_eq!(id_for_category(&cats(), "RENT").unwrap(), 3);
        assert!(id_for_category(&cats(), "Travel").is_err());
    }

    #[test]
    fn missing_category_reads_unknown() {
        assert_eq!(category_name(&cats(), Some(3)), "Rent");
        assert_eq!(category_name(&cats(), Some(99)), "Unknown");
        assert_eq!(category_name(&cats(), None), "Unknown");
    }
}
