// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::session::Session;
use anyhow::{Result, bail};
use rusqlite::Connection;

const SPECIAL_CHARS: &str = "@$!%*?&";

/// Rules a new password must meet before it is sent to the server.
pub fn password_problems(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if password.chars().count() < 8 {
        problems.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Must contain one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Must contain one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Must contain one number");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        problems.push("Must contain one special character (@$!%*?&)");
    }
    problems
}

/// Validate a new password and its confirmation.
pub fn check_new_password(password: &str, confirmation: &str) -> Result<()> {
    let problems = password_problems(password);
    if !problems.is_empty() {
        bail!("{}", problems.join("; "));
    }
    if password != confirmation {
        bail!("Passwords do not match");
    }
    Ok(())
}

pub fn login(
    conn: &Connection,
    session: &mut Session,
    api: &ApiClient,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim();
    let password = sub.get_one::<String>("password").unwrap();
    let token = api.login(email, password)?;
    session.login(token);
    session.save(conn)?;
    tracing::info!(email, "logged in");
    println!("Logged in as {}", email);
    Ok(())
}

pub fn signup(
    conn: &Connection,
    session: &mut Session,
    api: &ApiClient,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim();
    let password = sub.get_one::<String>("password").unwrap();
    let confirm = sub
        .get_one::<String>("confirm")
        .map(String::as_str)
        .unwrap_or(password);
    let token = api.signup(email, password, confirm)?;
    session.login(token);
    session.save(conn)?;
    println!("Account created; logged in as {}", email);
    Ok(())
}

pub fn logout(conn: &Connection, session: &mut Session) -> Result<()> {
    let was_logged_in = session.is_authenticated();
    session.logout();
    session.save(conn)?;
    if was_logged_in {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub fn password(
    conn: &Connection,
    session: &mut Session,
    api: &ApiClient,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("change", sub)) => {
            let current = sub.get_one::<String>("current").unwrap();
            let new = sub.get_one::<String>("new").unwrap();
            let confirm = sub.get_one::<String>("confirm").unwrap();
            check_new_password(new, confirm)?;
            println!("{}", api.change_password(current, new, confirm)?);
        }
        Some(("forgot", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim();
            println!("{}", api.forgot_password(email)?);
        }
        Some(("reset", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim();
            let new = sub.get_one::<String>("password").unwrap();
            let confirm = sub.get_one::<String>("confirm").unwrap();
            check_new_password(new, confirm)?;
            let reset = api.reset_password(token, new, confirm)?;
            println!("{}", reset.message);
            match reset.token {
                Some(t) => {
                    session.login(t);
                    session.save(conn)?;
                    println!("Logged in with the new password");
                }
                None => println!("Log in with `moneytrail login`"),
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_passwords_list_every_missing_rule() {
        assert_eq!(password_problems("Str0ng!pw"), Vec::<&str>::new());
        let p = password_problems("short");
        assert_eq!(
            p,
            [
                "Password must be at least 8 characters long",
                "Must contain one uppercase letter",
                "Must contain one number",
                "Must contain one special character (@$!%*?&)",
            ]
        );
        assert_eq!(password_problems("ALLUPPER1!"), ["Must contain one lowercase letter"]);
        assert_eq!(
            password_problems("Lower1case#"),
            ["Must contain one special character (@$!%*?&)"]
        );
    }

    #[test]
    fn confirmation_must_match() {
        assert!(check_new_password("Str0ng!pw", "Str0ng!pw").is_ok());
        let err = check_new_password("Str0ng!pw", "Str0ng!px").unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
        assert!(check_new_password("weak", "weak").is_err());
    }
}
