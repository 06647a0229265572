// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

fn month_arg(help: &'static str) -> Arg {
    Arg::new("month").long("month").value_name("YYYY-MM").help(help)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn month_code_arg() -> Arg {
    Arg::new("month_code")
        .required(true)
        .value_name("MMYYYY")
        .help("Review month code, e.g. 072025")
}

pub fn build_cli() -> Command {
    Command::new("moneytrail")
        .version(crate_version!())
        .about("Personal finance tracking client: dashboards, wall charts and monthly reviews")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the local state database"))
        .subcommand(
            Command::new("config")
                .about("Client settings")
                .subcommand(Command::new("show").about("Show the API URL and login state"))
                .subcommand(
                    Command::new("set-api")
                        .about("Set the API base URL")
                        .arg(Arg::new("url").required(true)),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and store the session token")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account and log in")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .help("Password confirmation (defaults to --password)"),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session token"))
        .subcommand(
            Command::new("password")
                .about("Change, forget or reset the account password")
                .subcommand(
                    Command::new("change")
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("new").long("new").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                )
                .subcommand(
                    Command::new("forgot")
                        .about("Email password reset instructions")
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("reset")
                        .about("Set a new password with a reset token")
                        .arg(Arg::new("token").long("token").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("The logged in user")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("wage")
                        .about("Set the hourly wage used for life energy hours")
                        .arg(Arg::new("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("default")
                                .long("default")
                                .help("Mark as a default category")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_args(
                    Command::new("expenses")
                        .about("One category's expenses for a month")
                        .arg(Arg::new("name").required(true))
                        .arg(month_arg("Month to show (defaults to the current month)")),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage expenses")
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg("Only expenses in this month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("match")
                                .long("match")
                                .value_name("REGEX")
                                .help("Only descriptions matching this pattern"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of an expense")
                        .arg(id_arg())
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("income")
                .about("Manage incomes")
                .subcommand(json_args(
                    Command::new("list").arg(month_arg("Only incomes in this month")),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("source").long("source").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(
                            Arg::new("work")
                                .long("work")
                                .help("Income earned from work")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of an income")
                        .arg(id_arg())
                        .arg(Arg::new("source").long("source"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("work")
                                .long("work")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("not-work"),
                        )
                        .arg(
                            Arg::new("not-work")
                                .long("not-work")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("notes")
                                .long("notes")
                                .help("New notes; an empty value clears them"),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Spending by category and totals for one month")
                .arg(month_arg("Month to summarize (defaults to the current month)")),
        ))
        .subcommand(json_args(
            Command::new("wallchart")
                .about("Monthly spending and income across the whole history")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Only show these category columns")
                        .action(ArgAction::Append),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("wallchart")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("review")
                .about("Monthly reviews")
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("start")
                        .about("Start (or reopen) the review for a month")
                        .arg(month_arg("Month to review (defaults to the current month)")),
                )
                .subcommand(json_args(Command::new("show").arg(month_code_arg())))
                .subcommand(
                    Command::new("notes")
                        .arg(month_code_arg())
                        .arg(Arg::new("text").required(true)),
                )
                .subcommand(Command::new("complete").arg(month_code_arg()))
                .subcommand(
                    Command::new("reopen")
                        .about("Mark a completed review as in progress again")
                        .arg(month_code_arg()),
                )
                .subcommand(Command::new("rebuild").arg(month_code_arg()))
                .subcommand(
                    Command::new("mark")
                        .about("Set one answer for a category review item")
                        .arg(month_code_arg())
                        .arg(
                            Arg::new("item")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("field")
                                .required(true)
                                .value_parser(["fulfillment", "aligned", "post-fi"]),
                        )
                        .arg(
                            Arg::new("mark")
                                .required(true)
                                .allow_hyphen_values(true)
                                .value_parser(["-", "0", "+"]),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Interactively mark category items; edits auto-save")
                        .arg(month_code_arg())
                        .arg(
                            Arg::new("quiet-ms")
                                .long("quiet-ms")
                                .default_value("500")
                                .value_parser(value_parser!(u64)),
                        ),
                ),
        )
}
