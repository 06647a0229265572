// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar month buckets shared by the dashboard and wall chart.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar year + month pair. Ordering compares the year first, then the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32, // 1..=12
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Bucket of a `YYYY-MM-DD` date string. Needs at least two `-`-separated
    /// integer components and a month in range; anything else has no bucket.
    pub fn parse(date: &str) -> Option<Self> {
        let mut parts = date.trim().split('-');
        let year = parts.next()?.trim().parse::<i32>().ok()?;
        let month = parts.next()?.trim().parse::<u32>().ok()?;
        Self::new(year, month)
    }

    /// Strict `YYYY-MM` parsing for user input.
    pub fn from_month_arg(s: &str) -> Result<Self> {
        let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(Self::from_date(d))
    }

    pub fn from_date(d: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// The following month, rolling December over into January.
    pub fn succ(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `min` to `max`, both ends included.
    pub fn range_inclusive(min: Self, max: Self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut cur = min;
        while cur <= max {
            out.push(cur);
            cur = cur.succ();
        }
        out
    }

    fn name(self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }

    /// Short chart label, e.g. `Jul 2025`.
    pub fn label(self) -> String {
        format!("{} {}", &self.name()[..3], self.year)
    }

    /// Long heading label, e.g. `July 2025`.
    pub fn long_label(self) -> String {
        format!("{} {}", self.name(), self.year)
    }

    pub fn first_day(self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Render a review month code (`MMYYYY`) as `July 2025`.
pub fn format_month_code(code: &str) -> Result<String> {
    if code.len() < 3 || !code.is_char_boundary(2) {
        return Err(anyhow!("Invalid month code '{}', expected MMYYYY", code));
    }
    let (mm, year) = code.split_at(2);
    let name = mm
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("Unknown");
    Ok(format!("{} {}", name, year))
}

/// Two-decimal display form used for every subtotal and total.
///
/// Rounds the exact binary value of `v`, with exact ties going away from
/// zero: `0.125` shows as `0.13`, while `1.005` (stored just below) shows
/// as `1.00`.
pub fn fmt_amount(v: f64) -> String {
    if v == 0.0 {
        return "0.00".into();
    }
    match Decimal::from_f64_retain(v) {
        Some(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", v),
    }
}
