// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerlens::analytics::{self, GroupBy, Report};
use ledgerlens::error::EngineError;
use ledgerlens::models::NewItem;
use ledgerlens::query::AnalyticsRequest;
use ledgerlens::{db, store};
use rusqlite::Connection;
use serde_json::json;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::prepare(&conn).unwrap();
    conn
}

fn add(conn: &Connection, kind: &str, amount: &str, date: &str, category: &str) {
    store::create(conn, NewItem::from_raw(kind, amount, date, category).unwrap()).unwrap();
}

fn request(from: &str, to: &str, group_by: Option<&str>) -> AnalyticsRequest {
    let mut params = vec![("from", from), ("to", to)];
    if let Some(g) = group_by {
        params.push(("group_by", g));
    }
    AnalyticsRequest::from_params(params).unwrap()
}

#[test]
fn two_items_on_one_day_group_into_one_bucket() {
    let conn = setup();
    add(&conn, "expense", "10.00", "2024-01-01T09:00:00Z", "Food");
    add(&conn, "expense", "20.00", "2024-01-01T18:00:00Z", "Food");

    let req = request("2024-01-01", "2024-01-01", Some("day"));
    let grouped = analytics::summarize_grouped(&conn, &req.range, GroupBy::Day).unwrap();
    assert_eq!(grouped.groups.len(), 1);
    let row = &grouped.groups[0];
    assert_eq!(row.group, "2024-01-01");
    assert_eq!(row.count, 2);
    assert_eq!(row.sum.to_string(), "30.00");
    assert_eq!(row.avg.unwrap().to_string(), "15.00");
    assert_eq!(row.median.unwrap().to_string(), "15.00");
    assert_eq!(grouped.total_sum.to_string(), "30.00");
    assert_eq!(grouped.total_count, 2);
    assert_eq!(grouped.total_avg.unwrap().to_string(), "15.00");
}

#[test]
fn items_on_consecutive_days_form_one_group_each() {
    let conn = setup();
    add(&conn, "expense", "10.00", "2024-01-01T10:00:00Z", "Food");
    add(&conn, "income", "20.00", "2024-01-02T10:00:00Z", "Salary");

    let req = request("2024-01-01", "2024-01-02", Some("day"));
    let Report::Grouped(grouped) = analytics::run(&conn, &req).unwrap() else {
        panic!("expected grouped report");
    };
    let rows: Vec<(&str, u64, String)> = grouped
        .groups
        .iter()
        .map(|g| (g.group.as_str(), g.count, g.sum.to_string()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("2024-01-01", 1, "10.00".to_string()),
            ("2024-01-02", 1, "20.00".to_string()),
        ]
    );
    assert_eq!(grouped.total_sum.to_string(), "30.00");
    assert_eq!(grouped.total_count, 2);
    assert_eq!(grouped.total_avg.unwrap().to_string(), "15.00");
}

#[test]
fn empty_range_reports_zeroes_and_omits_the_rest() {
    let conn = setup();
    add(&conn, "income", "5.00", "2023-06-01", "Gift");

    let req = request("2024-01-01", "2024-01-31", None);
    let summary = analytics::summarize(&conn, &req.range).unwrap();
    assert_eq!(summary.count, 0);
    assert_eq!(summary.sum.minor_units(), 0);
    assert!(summary.avg.is_none() && summary.median.is_none() && summary.p90.is_none());

    let grouped = analytics::summarize_grouped(&conn, &req.range, GroupBy::Week).unwrap();
    assert!(grouped.groups.is_empty());
    assert_eq!(grouped.total_count, 0);
    assert!(grouped.total_avg.is_none());

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(
        value,
        json!({
            "from": "2024-01-01T00:00:00Z",
            "to": "2024-01-31T23:59:59.999999999Z",
            "sum": "0.00",
            "count": 0
        })
    );
}

#[test]
fn grouped_totals_match_the_ungrouped_summary() {
    let conn = setup();
    for (amount, date) in [
        ("1.01", "2024-01-01T00:00:00Z"),
        ("2.02", "2024-01-01T23:59:59Z"),
        ("3.03", "2024-01-02T12:00:00Z"),
        ("4.04", "2024-01-05T08:00:00Z"),
        ("5.05", "2024-01-09T08:00:00Z"),
    ] {
        add(&conn, "expense", amount, date, "Misc");
    }
    let req = request("2024-01-01", "2024-01-09", None);
    let summary = analytics::summarize(&conn, &req.range).unwrap();
    for group_by in [GroupBy::Day, GroupBy::Week, GroupBy::Category] {
        let grouped = analytics::summarize_grouped(&conn, &req.range, group_by).unwrap();
        assert_eq!(grouped.total_sum, summary.sum, "{group_by}");
        assert_eq!(grouped.total_count, summary.count, "{group_by}");
        assert_eq!(grouped.total_avg, summary.avg, "{group_by}");
    }
}

#[test]
fn median_and_p90_interpolate() {
    let conn = setup();
    for amount in ["1.00", "2.00", "3.00", "4.00"] {
        add(&conn, "expense", amount, "2024-05-05", "Misc");
    }
    let req = request("2024-05-01", "2024-05-31", None);
    let summary = analytics::summarize(&conn, &req.range).unwrap();
    assert_eq!(summary.median.unwrap().to_string(), "2.50");
    assert_eq!(summary.p90.unwrap().to_string(), "3.70");
    assert_eq!(summary.avg.unwrap().to_string(), "2.50");
}

#[test]
fn categories_come_back_in_ascending_order() {
    let conn = setup();
    add(&conn, "expense", "1.00", "2024-01-01", "Travel");
    add(&conn, "expense", "1.00", "2024-01-01", "Food");
    add(&conn, "income", "9.00", "2024-01-01", "Salary");
    let req = request("2024-01-01", "2024-01-01", Some("category"));
    let Report::Grouped(grouped) = analytics::run(&conn, &req).unwrap() else {
        panic!("expected grouped report");
    };
    let labels: Vec<&str> = grouped.groups.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(labels, vec!["Food", "Salary", "Travel"]);
}

#[test]
fn weeks_are_labelled_by_iso_year_and_week() {
    let conn = setup();
    // Tuesday 2024-12-31 is in ISO week 1 of 2025; Sunday 2024-12-29 in week 52.
    add(&conn, "expense", "1.00", "2024-12-29T10:00:00Z", "Misc");
    add(&conn, "expense", "2.00", "2024-12-30T10:00:00Z", "Misc");
    add(&conn, "expense", "3.00", "2024-12-31T10:00:00Z", "Misc");
    add(&conn, "expense", "4.00", "2025-01-06T10:00:00Z", "Misc");

    let req = request("2024-12-23", "2025-01-12", Some("WEEK"));
    let Report::Grouped(grouped) = analytics::run(&conn, &req).unwrap() else {
        panic!("expected grouped report");
    };
    let rows: Vec<(&str, u64)> = grouped
        .groups
        .iter()
        .map(|g| (g.group.as_str(), g.count))
        .collect();
    assert_eq!(
        rows,
        vec![("2024-W52", 1), ("2025-W01", 2), ("2025-W02", 1)]
    );
}

#[test]
fn unsupported_grouping_is_an_error() {
    let conn = setup();
    let req = request("2024-01-01", "2024-01-31", Some("month"));
    match analytics::run(&conn, &req) {
        Err(EngineError::UnsupportedGrouping(value)) => assert_eq!(value, "month"),
        other => panic!("expected UnsupportedGrouping, got {other:?}"),
    }
}

#[test]
fn boundary_days_are_fully_included() {
    let conn = setup();
    add(&conn, "income", "1.00", "2024-03-01T00:00:00Z", "Misc");
    add(&conn, "income", "2.00", "2024-03-31T23:59:59.999Z", "Misc");
    add(&conn, "income", "4.00", "2024-04-01T00:00:00Z", "Misc");

    let req = request("2024-03-01T13:00:00Z", "2024-03-31T01:00:00Z", None);
    let Report::Summary(summary) = analytics::run(&conn, &req).unwrap() else {
        panic!("expected plain summary");
    };
    assert_eq!(summary.count, 2);
    assert_eq!(summary.sum.to_string(), "3.00");
    assert_eq!(summary.from, "2024-03-01T00:00:00Z");
}
