// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::Read;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use rusqlite::Connection;
use serde::Deserialize;

use crate::commands::required;
use crate::models::NewItem;
use crate::store;

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "type")]
    kind: String,
    amount: String,
    date: String,
    category: String,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("items", sub)) => import_items(conn, sub),
        _ => Ok(()),
    }
}

fn import_items(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = required(sub, "path")?.trim();
    let file = File::open(path).with_context(|| format!("Open CSV {path}"))?;
    let items = read_items(file)?;
    let created = store::create_many(conn, items)?;
    println!("Imported {} items from {}", created.len(), path);
    Ok(())
}

/// Parses and validates every row; the first bad row fails the whole file.
pub fn read_items<R: Read>(reader: R) -> Result<Vec<NewItem>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut items = Vec::new();
    for (idx, result) in rdr.deserialize::<ImportRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result.with_context(|| format!("Malformed CSV row at line {line}"))?;
        let item = NewItem::from_raw(&row.kind, &row.amount, &row.date, &row.category)
            .with_context(|| format!("Invalid item at line {line}"))?;
        items.push(item);
    }
    Ok(items)
}
