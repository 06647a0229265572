// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::month::fmt_amount;
use crate::series::{MonthlySeries, build_monthly_series};
use anyhow::{Context, Result, anyhow};

pub fn handle(api: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("wallchart", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            let snapshot = api.snapshot(None)?;
            let series =
                build_monthly_series(&snapshot.expenses, &snapshot.incomes, &snapshot.categories);
            export_wallchart(&series, &fmt, out)?;
            println!("Exported wall chart ({} months) to {}", series.months.len(), out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Write the series as CSV (one row per month, one column per category) or
/// as the JSON chart structure.
pub fn export_wallchart(series: &MonthlySeries, fmt: &str, out: &str) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            let mut header = vec!["month".to_string()];
            header.extend(series.category_names().map(str::to_string));
            header.push("total_expenses".into());
            header.push("total_income".into());
            wtr.write_record(&header)?;
            for (i, label) in series.month_labels.iter().enumerate() {
                let mut rec = vec![label.clone()];
                for c in &series.category_totals_by_month {
                    rec.push(fmt_amount(c.totals[i]));
                }
                rec.push(fmt_amount(series.total_expenses_by_month[i]));
                rec.push(fmt_amount(series.total_income_by_month[i]));
                wtr.write_record(&rec)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(series)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(())
}
