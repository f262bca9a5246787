// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decoding of raw `key=value` parameters into validated requests.
//!
//! Everything here runs before the store is touched: unknown keys, empty
//! values, unparsable dates and reversed ranges are all rejected up front.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

use crate::error::ValidationError;
use crate::models::ItemType;
use crate::query::predicate::ItemFilter;
use crate::query::sort::Sort;
use crate::utils::{parse_end_timestamp, parse_timestamp};

pub const LIST_PARAMS: [&str; 6] = ["from", "to", "type", "category", "sort_by", "sort_order"];
pub const ANALYTICS_PARAMS: [&str; 3] = ["from", "to", "group_by"];

/// Collects parameters, keeping the first value of a repeated key.
fn collect_params<'a, I>(
    params: I,
    allowed: &[&str],
) -> Result<BTreeMap<&'a str, &'a str>, ValidationError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut map = BTreeMap::new();
    for (key, value) in params {
        if !allowed.contains(&key) {
            return Err(ValidationError::UnknownParameter(key.to_string()));
        }
        map.entry(key).or_insert(value);
    }
    Ok(map)
}

/// A present-but-blank value is an error for keys where blank has no meaning.
fn non_blank<'a>(
    map: &BTreeMap<&str, &'a str>,
    key: &str,
) -> Result<Option<&'a str>, ValidationError> {
    match map.get(key).copied().map(str::trim) {
        Some("") => Err(ValidationError::EmptyParameter(key.to_string())),
        other => Ok(other),
    }
}

type ParseBound = fn(&str, &str) -> Result<DateTime<FixedOffset>, ValidationError>;

/// A missing or blank bound is no bound.
fn optional_bound(
    map: &BTreeMap<&str, &str>,
    key: &str,
    parse: ParseBound,
) -> Result<Option<DateTime<FixedOffset>>, ValidationError> {
    match map.get(key).copied().map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse(key, raw).map(Some),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub filter: ItemFilter,
    pub sort: Sort,
}

impl ListRequest {
    pub fn from_params<'a, I>(params: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map = collect_params(params, &LIST_PARAMS)?;

        let from = optional_bound(&map, "from", parse_timestamp)?;
        // A bare date as upper bound keeps the whole day.
        let to = optional_bound(&map, "to", parse_end_timestamp)?;
        if let (Some(from), Some(to)) = (&from, &to) {
            if from > to {
                return Err(ValidationError::InvertedRange);
            }
        }

        let r#type = non_blank(&map, "type")?
            .map(str::parse::<ItemType>)
            .transpose()?;
        let category = map
            .get("category")
            .copied()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let sort = Sort::resolve(non_blank(&map, "sort_by")?, non_blank(&map, "sort_order")?);

        Ok(Self {
            filter: ItemFilter {
                from: from.map(|ts| ts.with_timezone(&Utc)),
                to: to.map(|ts| ts.with_timezone(&Utc)),
                r#type,
                category,
            },
            sort,
        })
    }
}

/// Inclusive analytics range, widened to whole days.
///
/// `from` becomes the start of its day and `to` the last nanosecond of its
/// day, each in the offset the bound was written in, so records on the
/// boundary days are fully included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl AnalyticsRange {
    pub fn new(
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedRange);
        }
        let start = from
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_local_timezone(*from.offset())
            .single();
        let end = to
            .date_naive()
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .and_then(|end| end.and_local_timezone(*to.offset()).single());
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self {
                from: start.with_timezone(&Utc),
                to: end.with_timezone(&Utc),
            }),
            (None, _) => Err(ValidationError::InvalidDate {
                field: "from".to_string(),
                value: from.to_rfc3339(),
            }),
            (_, None) => Err(ValidationError::InvalidDate {
                field: "to".to_string(),
                value: to.to_rfc3339(),
            }),
        }
    }

    pub fn as_filter(&self) -> ItemFilter {
        ItemFilter {
            from: Some(self.from),
            to: Some(self.to),
            ..ItemFilter::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRequest {
    pub range: AnalyticsRange,
    /// Checked by the aggregator, which fails loudly on unknown buckets.
    pub group_by: Option<String>,
}

impl AnalyticsRequest {
    pub fn from_params<'a, I>(params: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map = collect_params(params, &ANALYTICS_PARAMS)?;
        let required = |key: &str| -> Result<DateTime<FixedOffset>, ValidationError> {
            match map.get(key).copied().map(str::trim).filter(|v| !v.is_empty()) {
                Some(raw) => parse_timestamp(key, raw),
                None => Err(ValidationError::MissingParameter(key.to_string())),
            }
        };
        let range = AnalyticsRange::new(required("from")?, required("to")?)?;
        let group_by = map
            .get("group_by")
            .copied()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Self { range, group_by })
    }
}
