// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneytrail::commands::exporter::export_wallchart;
use moneytrail::models::{Category, Expense, Income};
use moneytrail::series::{MonthlySeries, build_monthly_series};
use serde_json::Value;
use tempfile::tempdir;

fn series() -> MonthlySeries {
    let cats = vec![
        Category {
            id: 1,
            name: "Groceries".into(),
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
            id: 1,
            description: "Weekly run".into(),
            amount: Some("12.34".into()),
            category_id: Some(1),
            occurred_on: Some("2025-12-02".into()),
        },
        Expense {
            id: 2,
            description: "Rent".into(),
            amount: Some("1000".into()),
            category_id: Some(2),
            occurred_on: Some("2026-02-01".into()),
        },
    ];
    let incs = vec![Income {
        id: 1,
        source: "Salary".into(),
        amount: Some("2500".into()),
        received_on: Some("2026-01-15".into()),
        ..Default::default()
    }];
    build_monthly_series(&exps, &incs, &cats)
}

#[test]
fn export_wallchart_csv() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("wall.csv");
    let out_str = out.to_string_lossy().to_string();
    export_wallchart(&series(), "csv", &out_str).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["month", "Groceries", "Rent", "total_expenses", "total_income"]
    );
    let rows: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], ["Dec 2025", "12.34", "0.00", "12.34", "0.00"]);
    assert_eq!(rows[1], ["Jan 2026", "0.00", "0.00", "0.00", "2500.00"]);
    assert_eq!(rows[2], ["Feb 2026", "0.00", "1000.00", "1000.00", "0.00"]);
}

#[test]
fn export_wallchart_json() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("wall.json");
    let out_str = out.to_string_lossy().to_string();
    export_wallchart(&series(), "json", &out_str).unwrap();

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["month_labels"][1], "Jan 2026");
    assert_eq!(v["category_totals_by_month"]["Rent"][2], 1000.0);
    assert_eq!(v["total_income_by_month"][1], 2500.0);
}

#[test]
fn export_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("wall.xml");
    assert!(export_wallchart(&series(), "xml", &out.to_string_lossy()).is_err());
}
