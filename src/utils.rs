// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValidationError::EmptyParameter(field.to_string()));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: field.to_string(),
            value: s.to_string(),
        })
}

/// Upper-bound variant of [`parse_timestamp`]: a bare `YYYY-MM-DD` stands
/// for the last nanosecond of that UTC day.
pub fn parse_end_timestamp(
    field: &str,
    raw: &str,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    let day_end = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999));
    match day_end {
        Some(end) => Ok(end.and_utc().fixed_offset()),
        None => parse_timestamp(field, raw),
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}

pub fn fmt_optional(amount: Option<Money>) -> String {
    amount.map_or_else(|| "-".to_string(), |m| m.to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc3339_and_bare_dates() {
        let ts = parse_timestamp("from", "2024-01-02T10:30:00+03:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 3 * 3600);
        let day = parse_timestamp("from", " 2024-01-02 ").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn bare_end_dates_cover_the_whole_day() {
        let end = parse_end_timestamp("to", "2024-01-03").unwrap();
        assert_eq!(end.to_rfc3339(), "2024-01-03T23:59:59.999999999+00:00");
        let exact = parse_end_timestamp("to", "2024-01-03T12:00:00+02:00").unwrap();
        assert_eq!(exact.to_rfc3339(), "2024-01-03T12:00:00+02:00");
        assert!(matches!(
            parse_end_timestamp("to", "soon"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn rejects_unparsable_dates() {
        assert_eq!(
            parse_timestamp("to", "02/01/2024"),
            Err(ValidationError::InvalidDate {
                field: "to".into(),
                value: "02/01/2024".into()
            })
        );
        assert_eq!(
            parse_timestamp("to", "  "),
            Err(ValidationError::EmptyParameter("to".into()))
        );
    }
}
