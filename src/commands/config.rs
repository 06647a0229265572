// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::Session;
use crate::utils::{API_URL_ENV, api_url, pretty_table, set_api_url};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-api", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim();
            set_api_url(conn, url)?;
            println!("API URL set to {}", url.trim_end_matches('/'));
            if std::env::var(API_URL_ENV).is_ok() {
                println!("Note: {} is set and takes precedence", API_URL_ENV);
            }
        }
        Some(("show", _)) => {
            let rows = vec![
                vec!["api_url".to_string(), api_url(conn)?],
                vec![
                    "session".to_string(),
                    if session.is_authenticated() {
                        "logged in".to_string()
                    } else {
                        "logged out".to_string()
                    },
                ],
                vec![
                    "state_db".to_string(),
                    crate::db::db_path()?.display().to_string(),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
