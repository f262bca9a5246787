// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

/// Filter and sort flags shared by `item list` and `export items`. Arg ids
/// match the request parameter keys.
fn list_filter_args() -> [Arg; 6] {
    [
        Arg::new("from")
            .long("from")
            .help("Earliest date (RFC 3339 or YYYY-MM-DD), inclusive"),
        Arg::new("to")
            .long("to")
            .help("Latest date (RFC 3339, or YYYY-MM-DD for the whole day), inclusive"),
        Arg::new("type").long("type").help("income|expense"),
        Arg::new("category").long("category").help("Exact category"),
        Arg::new("sort_by")
            .long("sort-by")
            .help("date|amount|category (default date)"),
        Arg::new("sort_order")
            .long("sort-order")
            .help("asc|desc (default desc)"),
    ]
}

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Output one JSON object per line"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Item id (UUID)")
}

pub fn build_cli() -> Command {
    Command::new("ledgerlens")
        .version(crate_version!())
        .about("Track income and expense items; list, export and analyze them")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (overrides config and environment)"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .help("trace|debug|info|warn|error"),
        )
        .subcommand(Command::new("init").about("Create the database and print its path"))
        .subcommand(
            Command::new("item")
                .about("Manage items")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record an item")
                        .arg(Arg::new("type").long("type").required(true).help("income|expense"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Decimal amount, at most two fraction digits"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("RFC 3339 or YYYY-MM-DD"),
                        )
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(Command::new("get").about("Show one item").arg(id_arg()))
                .subcommand(
                    Command::new("list")
                        .about("List items")
                        .args(list_filter_args())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("update")
                        .about("Change fields of an item")
                        .arg(id_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").about("Delete an item").arg(id_arg())),
        )
        .subcommand(
            Command::new("analytics")
                .about("Sum, average, median and p90 over a date range")
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true))
                .arg(
                    Arg::new("group_by")
                        .long("group-by")
                        .help("day|week|category"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("items")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").help("Output file (stdout if absent)"))
                        .args(list_filter_args()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("items").arg(
                        Arg::new("path")
                            .required(true)
                            .help("CSV with header type,amount,date,category"),
                    ),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored items for inconsistencies"))
}
