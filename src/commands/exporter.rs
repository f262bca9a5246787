// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result, bail};
use chrono::SecondsFormat;
use rusqlite::Connection;

use crate::commands::{list_request, required};
use crate::models::Item;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("items", sub)) => export_items(conn, sub),
        _ => Ok(()),
    }
}

fn export_items(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = match required(sub, "format")?.trim().to_lowercase().as_str() {
        "csv" => Format::Csv,
        "json" => Format::Json,
        other => bail!("Unknown format: {other} (use csv|json)"),
    };
    let request = list_request(sub)?;
    let items = store::list_for_export(conn, &request)?;

    let out = sub.get_one::<String>("out").map(|s| s.trim());
    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Create {path}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match fmt {
        Format::Csv => write_items_csv(writer, &items)?,
        Format::Json => write_items_json(writer, &items)?,
    }
    if let Some(path) = out {
        println!("Exported {} items to {}", items.len(), path);
    }
    Ok(())
}

pub fn write_items_csv<W: Write>(writer: W, items: &[Item]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "id",
        "type",
        "amount",
        "date",
        "category",
        "created_at",
        "updated_at",
    ])?;
    for item in items {
        wtr.write_record([
            item.id.to_string(),
            item.r#type.to_string(),
            item.amount.to_string(),
            item.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            item.category.clone(),
            item.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            item.updated_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_items_json<W: Write>(mut writer: W, items: &[Item]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, items)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
