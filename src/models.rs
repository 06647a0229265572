// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid number regex")
});

/// Decode a field, falling back to its default when the value is null or
/// has the wrong JSON type. One bad field never rejects the whole record.
pub fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Amounts arrive from the API either as decimal strings or JSON numbers.
/// Anything else is kept as `Other` and counts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Amount {
    /// Numeric value of the amount. Text reads its leading number, so
    /// `"12.50 USD"` is 12.5 and `"1,200"` is 1. Anything without a leading
    /// number, or non-finite, is zero.
    pub fn value(&self) -> f64 {
        let v = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => leading_number(s),
            Amount::Other(_) => 0.0,
        };
        if v.is_finite() { v } else { 0.0 }
    }
}

fn leading_number(s: &str) -> f64 {
    LEADING_NUMBER
        .find(s)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        Amount::Number(v)
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

/// Value of an optional amount field, treating a missing amount as zero.
pub fn amount_value(a: Option<&Amount>) -> f64 {
    a.map(Amount::value).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub occurred_on: Option<String>, // YYYY-MM-DD
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Income {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub received_on: Option<String>, // YYYY-MM-DD
    #[serde(default, deserialize_with = "lenient")]
    pub is_work_income: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient")]
    pub hourly_wage: Option<Amount>,
}

/// Request body for creating or updating an expense, wrapped as
/// `{"expense": ...}` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: String,
    pub category_id: i64,
    pub occurred_on: String,
}

/// Request body for creating or updating an income, wrapped as
/// `{"income": ...}` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct NewIncome {
    pub source: String,
    pub amount: String,
    pub received_on: String,
    pub is_work_income: bool,
    pub notes: Option<String>,
}

/// Categories, expenses and incomes fetched together so that name
/// resolution during aggregation sees one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
}
