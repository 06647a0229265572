// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Amount, User, lenient};
use crate::month::YearMonth;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Answer to one of the three review questions for a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    #[serde(rename = "-")]
    Minus,
    #[default]
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "+")]
    Plus,
}

impl FromStr for Mark {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "-" => Ok(Mark::Minus),
            "0" => Ok(Mark::Zero),
            "+" => Ok(Mark::Plus),
            other => Err(anyhow!("Invalid mark '{}', expected -, 0 or +", other)),
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mark::Minus => "-",
            Mark::Zero => "0",
            Mark::Plus => "+",
        })
    }
}

/// Which review question a mark answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkField {
    Fulfillment,
    Aligned,
    PostFi,
}

impl FromStr for MarkField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "fulfillment" | "received_fulfillment" => Ok(MarkField::Fulfillment),
            "aligned" | "aligned_with_values" => Ok(MarkField::Aligned),
            "post-fi" | "post_fi" | "would_change_post_fi" => Ok(MarkField::PostFi),
            other => Err(anyhow!(
                "Unknown field '{}', expected fulfillment, aligned or post-fi",
                other
            )),
        }
    }
}

/// Body of `PATCH /monthly_category_reviews/:id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMarks {
    pub received_fulfillment: Mark,
    pub aligned_with_values: Mark,
    pub would_change_post_fi: Mark,
}

impl CategoryMarks {
    pub fn set(&mut self, field: MarkField, mark: Mark) {
        match field {
            MarkField::Fulfillment => self.received_fulfillment = mark,
            MarkField::Aligned => self.aligned_with_values = mark,
            MarkField::PostFi => self.would_change_post_fi = mark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCategoryReview {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_spent: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_life_energy_hours: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub received_fulfillment: Option<Mark>,
    #[serde(default, deserialize_with = "lenient")]
    pub aligned_with_values: Option<Mark>,
    #[serde(default, deserialize_with = "lenient")]
    pub would_change_post_fi: Option<Mark>,
}

impl MonthlyCategoryReview {
    /// Current marks. Unanswered questions, and answers other than `-`, `0`
    /// or `+`, read as `0`.
    pub fn marks(&self) -> CategoryMarks {
        CategoryMarks {
            received_fulfillment: self.received_fulfillment.unwrap_or_default(),
            aligned_with_values: self.aligned_with_values.unwrap_or_default(),
            would_change_post_fi: self.would_change_post_fi.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReview {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub month_code: String, // MMYYYY
    #[serde(default, deserialize_with = "lenient")]
    pub month_start: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_income: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_expenses: Option<Amount>,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthly_category_reviews: Vec<MonthlyCategoryReview>,
}

/// Month of a `MMYYYY` review code.
pub fn month_of_code(code: &str) -> Option<YearMonth> {
    if code.len() != 6 || !code.is_char_boundary(2) {
        return None;
    }
    let (mm, yyyy) = code.split_at(2);
    YearMonth::new(yyyy.parse().ok()?, mm.parse().ok()?)
}

/// Month code the API uses for `month`.
pub fn month_code(month: YearMonth) -> String {
    format!("{:02}{:04}", month.month, month.year)
}

/// Newest review month first. Codes that do not parse sort last.
pub fn sort_newest_first(reviews: &mut [MonthlyReview]) {
    reviews.sort_by(|a, b| {
        let ka = month_of_code(&a.month_code);
        let kb = month_of_code(&b.month_code);
        kb.cmp(&ka).then_with(|| b.month_code.cmp(&a.month_code))
    });
}
