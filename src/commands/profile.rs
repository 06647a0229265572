// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::models::{User, amount_value};
use crate::month::fmt_amount;
use crate::session::Session;
use crate::utils::{maybe_print_json, parse_amount_arg, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(api: &ApiClient, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let user_id = session
        .user_id()
        .ok_or_else(|| anyhow!("Not logged in; run `moneytrail login`."))?;
    match m.subcommand() {
        Some(("show", sub)) => {
            let user = api.user(user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &user)? {
                println!("{}", pretty_table(&["Field", "Value"], profile_rows(&user)));
            }
        }
        Some(("wage", sub)) => {
            let wage = parse_amount_arg(sub.get_one::<String>("amount").unwrap())?;
            let user = api.update_hourly_wage(user_id, &wage)?;
            println!(
                "Hourly wage set to ${}",
                fmt_amount(amount_value(user.hourly_wage.as_ref()))
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn profile_rows(user: &User) -> Vec<Vec<String>> {
    let wage = match &user.hourly_wage {
        Some(w) => format!("${}", fmt_amount(w.value())),
        None => "not set".into(),
    };
    vec![
        vec!["Email".into(), user.email.clone()],
        vec!["Hourly wage".into(), wage],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wage_shows_two_decimals_or_not_set() {
        let user: User =
            serde_json::from_str(r#"{"id":3,"email":"me@example.com","hourly_wage":"27.5"}"#)
                .unwrap();
        assert_eq!(profile_rows(&user)[1], ["Hourly wage", "$27.50"]);
        let user: User = serde_json::from_str(r#"{"id":3,"email":null,"hourly_wage":null}"#).unwrap();
        assert_eq!(profile_rows(&user)[0], ["Email", ""]);
        assert_eq!(profile_rows(&user)[1], ["Hourly wage", "not set"]);
    }
}
