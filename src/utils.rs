// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Once;

const UA: &str = concat!(
    "moneytrail/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/moneytrail)"
);

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "MONEYTRAIL_API_URL";
pub const LOG_ENV: &str = "MONEYTRAIL_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber. The filter comes from `MONEYTRAIL_LOG`
/// and defaults to warnings from this crate only.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("moneytrail=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_amount_arg(s: &str) -> Result<String> {
    let v: f64 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if !v.is_finite() || v < 0.0 {
        anyhow::bail!("Invalid amount '{}', expected a non-negative number", s);
    }
    Ok(s.trim().to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

/// API base URL: the environment override wins, then the stored setting,
/// then the local development default.
pub fn api_url(conn: &Connection) -> Result<String> {
    if let Ok(v) = std::env::var(API_URL_ENV) {
        if !v.trim().is_empty() {
            return Ok(v.trim().trim_end_matches('/').to_string());
        }
    }
    stored_api_url(conn)
}

pub fn stored_api_url(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "api_url")?
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string()))
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url).with_context(|| format!("Invalid API URL '{}'", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("API URL must use http or https, got '{}'", parsed.scheme());
    }
    set_setting(conn, "api_url", url.trim_end_matches('/'))
}
