// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::analytics::{self, GroupedSummary, Report, Summary};
use crate::query::AnalyticsRequest;
use crate::query::request::ANALYTICS_PARAMS;
use crate::utils::{fmt_optional, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let pairs: Vec<(&str, &str)> = ANALYTICS_PARAMS
        .iter()
        .filter_map(|key| sub.get_one::<String>(key).map(|v| (*key, v.as_str())))
        .collect();
    let request = AnalyticsRequest::from_params(pairs)?;
    let report = analytics::run(conn, &request)?;
    if maybe_print_json(sub.get_flag("json"), false, &report)? {
        return Ok(());
    }
    match &report {
        Report::Summary(summary) => print_summary(summary),
        Report::Grouped(grouped) => print_grouped(grouped),
    }
    Ok(())
}

fn print_summary(s: &Summary) {
    println!("Range: {} .. {}", s.from, s.to);
    println!(
        "{}",
        pretty_table(
            &["Count", "Sum", "Avg", "Median", "P90"],
            vec![vec![
                s.count.to_string(),
                s.sum.to_string(),
                fmt_optional(s.avg),
                fmt_optional(s.median),
                fmt_optional(s.p90),
            ]],
        )
    );
}

fn print_grouped(g: &GroupedSummary) {
    println!("Range: {} .. {}", g.from, g.to);
    let mut rows: Vec<Vec<String>> = g
        .groups
        .iter()
        .map(|row| {
            vec![
                row.group.clone(),
                row.count.to_string(),
                row.sum.to_string(),
                fmt_optional(row.avg),
                fmt_optional(row.median),
                fmt_optional(row.p90),
            ]
        })
        .collect();
    rows.push(vec![
        "TOTAL".into(),
        g.total_count.to_string(),
        g.total_sum.to_string(),
        fmt_optional(g.total_avg),
        "-".into(),
        "-".into(),
    ]);
    println!(
        "{}",
        pretty_table(&["Group", "Count", "Sum", "Avg", "Median", "P90"], rows)
    );
}
