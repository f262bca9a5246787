// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod items;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::query::ListRequest;
use crate::query::request::LIST_PARAMS;

/// Value of an argument clap already marks as required.
pub(crate) fn required<'a>(sub: &'a ArgMatches, id: &str) -> Result<&'a str> {
    sub.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing --{id}"))
}

/// Builds a listing request from the filter flags shared by `item list` and
/// `export items`.
pub fn list_request(sub: &ArgMatches) -> Result<ListRequest> {
    let pairs: Vec<(&str, &str)> = LIST_PARAMS
        .iter()
        .filter_map(|key| sub.get_one::<String>(key).map(|v| (*key, v.as_str())))
        .collect();
    Ok(ListRequest::from_params(pairs)?)
}
