// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;

use moneytrail::api::{ApiClient, ApiError};
use moneytrail::session::Session;
use moneytrail::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let mut session = Session::load(&conn)?;
    let api = Arc::new(ApiClient::new(&utils::api_url(&conn)?, &session)?);

    let res = match matches.subcommand() {
        Some(("init", _)) => {
            println!("State database initialized at {}", db::db_path()?.display());
            Ok(())
        }
        Some(("config", sub)) => commands::config::handle(&conn, &session, sub),
        Some(("login", sub)) => commands::auth::login(&conn, &mut session, &api, sub),
        Some(("signup", sub)) => commands::auth::signup(&conn, &mut session, &api, sub),
        Some(("logout", _)) => commands::auth::logout(&conn, &mut session),
        Some(("password", sub)) => commands::auth::password(&conn, &mut session, &api, sub),
        Some(("profile", sub)) => commands::profile::handle(&api, &session, sub),
        Some(("category", sub)) => commands::categories::handle(&api, sub),
        Some(("expense", sub)) => commands::expenses::handle(&api, sub),
        Some(("income", sub)) => commands::incomes::handle(&api, sub),
        Some(("dashboard", sub)) => commands::dashboard::handle(&api, sub),
        Some(("wallchart", sub)) => commands::wallchart::handle(&api, sub),
        Some(("export", sub)) => commands::exporter::handle(&api, sub),
        Some(("review", sub)) => commands::reviews::handle(Arc::clone(&api), sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(e) = &res {
        if e.downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized)
        {
            eprintln!("Session expired or missing; run `moneytrail login`.");
        }
    }
    res
}
