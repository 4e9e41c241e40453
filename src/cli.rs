// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn output_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("format")
            .long("format")
            .default_value("text")
            .help("Document format: text|json|csv"),
    )
    .arg(
        Arg::new("out")
            .long("out")
            .help("Directory to write the report into (default: CASHTRACK_OUT_DIR or .)"),
    )
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("date")
            .long("date")
            .required(required)
            .help("YYYY-MM-DD"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .help("income|expense"),
    )
    .arg(Arg::new("category").long("category").required(required))
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(
        Arg::new("description")
            .long("description")
            .short('d')
            .help("Free text"),
    )
}

pub fn build_cli() -> Command {
    Command::new("cashtrack")
        .about("Personal cash-flow tracking and reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (default: CASHTRACK_DB or the data dir)"),
        )
        .arg(
            Arg::new("owner")
                .long("owner")
                .global(true)
                .help("Owner id every read and write is scoped to (default: CASHTRACK_OWNER)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("tx")
                .about("Record and manage transactions")
                .subcommand(tx_fields(Command::new("add"), true))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .conflicts_with("month")
                                .help("YYYY"),
                        )
                        .arg(Arg::new("type").long("type").help("income|expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize))
                                .help("1-based page of 10 rows"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .conflicts_with("page"),
                        ),
                ))
                .subcommand(tx_fields(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                    false,
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every transaction of the owner")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm; nothing is deleted without it"),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("User-defined categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("type").long("type").help("income|expense")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards and report documents")
                .subcommand(output_args(
                    Command::new("monthly")
                        .about("Monthly report document")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        ),
                ))
                .subcommand(output_args(
                    Command::new("annual")
                        .about("Annual report document")
                        .arg(Arg::new("year").long("year").required(true).help("YYYY"))
                        .arg(
                            Arg::new("detail_limit")
                                .long("detail-limit")
                                .value_parser(value_parser!(usize))
                                .help("Most recent transactions to list (default 20)"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("detail_limit")
                                .help("List every transaction of the year"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("dashboard")
                        .about("Balance, current month and the year month by month")
                        .arg(Arg::new("year").long("year").help("YYYY (default: this year)")),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Category breakdown")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .conflicts_with("month")
                                .help("YYYY"),
                        )
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("settings").subcommand(
                Command::new("currency")
                    .about("Show or set the currency symbol used in reports")
                    .arg(Arg::new("symbol")),
            ),
        )
}
