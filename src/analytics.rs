// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sum, average, median and 90th percentile over a date range, optionally
//! bucketed by day, ISO week or category.
//!
//! Grouped totals are composed from the group rows; the store is queried
//! once per report.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, SecondsFormat};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::query::{AnalyticsRange, AnalyticsRequest, Predicate};

const AGGREGATES: &str = "COALESCE(SUM(amount), 0), AVG(amount), COUNT(*), \
                          percentile_cont(amount, 0.5), percentile_cont(amount, 0.9)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Day,
    Week,
    Category,
}

impl GroupBy {
    /// SQL expression yielding the bucket key; keys sort in bucket order.
    const fn bucket_sql(self) -> &'static str {
        match self {
            Self::Day => "substr(date, 1, 10)",
            // Monday on or before the item's UTC day.
            Self::Week => "date(substr(date, 1, 10), '-6 days', 'weekday 1')",
            Self::Category => "category",
        }
    }

    /// Turns a bucket key into the label callers see.
    fn label(self, key: String) -> std::result::Result<String, chrono::ParseError> {
        match self {
            Self::Day | Self::Category => Ok(key),
            Self::Week => {
                let week = NaiveDate::parse_from_str(&key, "%Y-%m-%d")?.iso_week();
                Ok(format!("{}-W{:02}", week.year(), week.week()))
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "category" => Ok(Self::Category),
            _ => Err(EngineError::UnsupportedGrouping(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub from: String,
    pub to: String,
    pub sum: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<Money>,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub group: String,
    pub sum: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<Money>,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedSummary {
    pub from: String,
    pub to: String,
    pub groups: Vec<GroupRow>,
    pub total_sum: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_avg: Option<Money>,
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Summary(Summary),
    Grouped(GroupedSummary),
}

/// Aggregate columns as read from the store, before rounding to money.
struct RawAggregates {
    sum: i64,
    avg: Option<f64>,
    count: i64,
    median: Option<f64>,
    p90: Option<f64>,
}

impl RawAggregates {
    fn read(row: &Row<'_>, first: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            sum: row.get(first)?,
            avg: row.get(first + 1)?,
            count: row.get(first + 2)?,
            median: row.get(first + 3)?,
            p90: row.get(first + 4)?,
        })
    }

    /// `(sum, avg, count, median, p90)`; the optional figures only exist for
    /// a non-empty set.
    fn into_money(self) -> Result<(Money, Option<Money>, u64, Option<Money>, Option<Money>)> {
        let count = self.count.unsigned_abs();
        let present = |value: Option<f64>| -> Result<Option<Money>> {
            match value.filter(|_| count > 0) {
                Some(v) => Money::from_minor_f64(v)
                    .map(Some)
                    .ok_or(EngineError::AmountOverflow),
                None => Ok(None),
            }
        };
        Ok((
            Money::from_minor(self.sum),
            present(self.avg)?,
            count,
            present(self.median)?,
            present(self.p90)?,
        ))
    }
}

fn bound_labels(range: &AnalyticsRange) -> (String, String) {
    (
        range.from.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        range.to.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    )
}

pub fn summarize(conn: &Connection, range: &AnalyticsRange) -> Result<Summary> {
    let fragment = Predicate::from_filter(&range.as_filter()).render();
    let sql = format!("SELECT {AGGREGATES} FROM items {}", fragment.sql);
    tracing::debug!(%sql, "summarizing items");
    let raw = conn.query_row(&sql, fragment.params(), |row| RawAggregates::read(row, 0))?;
    let (sum, avg, count, median, p90) = raw.into_money()?;
    let (from, to) = bound_labels(range);
    Ok(Summary {
        from,
        to,
        sum,
        avg,
        count,
        median,
        p90,
    })
}

pub fn summarize_grouped(
    conn: &Connection,
    range: &AnalyticsRange,
    group_by: GroupBy,
) -> Result<GroupedSummary> {
    let fragment = Predicate::from_filter(&range.as_filter()).render();
    let sql = format!(
        "SELECT {bucket} AS bucket, {AGGREGATES} FROM items {} GROUP BY bucket ORDER BY bucket ASC",
        fragment.sql,
        bucket = group_by.bucket_sql(),
    );
    tracing::debug!(%sql, %group_by, "summarizing grouped items");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(fragment.params(), |row| {
        let key: String = row.get(0)?;
        let label = group_by
            .label(key)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        Ok((label, RawAggregates::read(row, 1)?))
    })?;

    let mut groups = Vec::new();
    let mut total_sum = Money::ZERO;
    let mut total_count: u64 = 0;
    for row in rows {
        let (group, raw) = row?;
        let (sum, avg, count, median, p90) = raw.into_money()?;
        total_sum = total_sum
            .checked_add(sum)
            .ok_or(EngineError::AmountOverflow)?;
        total_count += count;
        groups.push(GroupRow {
            group,
            sum,
            avg,
            count,
            median,
            p90,
        });
    }

    let (from, to) = bound_labels(range);
    Ok(GroupedSummary {
        from,
        to,
        groups,
        total_sum,
        total_avg: total_sum.div_round(total_count),
        total_count,
    })
}

/// Runs the grouped report when `group_by` is set, the plain one otherwise.
pub fn run(conn: &Connection, request: &AnalyticsRequest) -> Result<Report> {
    match request.group_by.as_deref() {
        Some(raw) => {
            let group_by: GroupBy = raw.parse()?;
            summarize_grouped(conn, &request.range, group_by).map(Report::Grouped)
        }
        None => summarize(conn, &request.range).map(Report::Summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_by_parses_case_insensitively() {
        assert_eq!("DAY".parse::<GroupBy>().unwrap(), GroupBy::Day);
        assert_eq!(" Week ".parse::<GroupBy>().unwrap(), GroupBy::Week);
        assert_eq!("category".parse::<GroupBy>().unwrap(), GroupBy::Category);
        match "month".parse::<GroupBy>() {
            Err(EngineError::UnsupportedGrouping(value)) => assert_eq!(value, "month"),
            other => panic!("expected UnsupportedGrouping, got {other:?}"),
        }
    }

    #[test]
    fn week_labels_use_iso_year_and_week() {
        let label = |key: &str| GroupBy::Week.label(key.to_string()).unwrap();
        assert_eq!(label("2024-01-01"), "2024-W01");
        assert_eq!(label("2024-03-04"), "2024-W10");
        // Monday 2024-12-30 belongs to the first ISO week of 2025.
        assert_eq!(label("2024-12-30"), "2025-W01");
        // Monday 2020-12-28 belongs to week 53 of 2020.
        assert_eq!(label("2020-12-28"), "2020-W53");
    }

    #[test]
    fn day_and_category_keys_pass_through() {
        assert_eq!(
            GroupBy::Day.label("2024-01-05".into()).unwrap(),
            "2024-01-05"
        );
        assert_eq!(GroupBy::Category.label("Food".into()).unwrap(), "Food");
    }
}
