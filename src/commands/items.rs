// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::SecondsFormat;
use rusqlite::Connection;
use serde::Serialize;

use crate::commands::{list_request, required};
use crate::models::{Item, ItemPatch, NewItem};
use crate::store;
use crate::utils::{maybe_print_json, parse_id, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub),
        Some(("get", sub)) => get(conn, sub),
        Some(("list", sub)) => list(conn, sub),
        Some(("update", sub)) => update(conn, sub),
        Some(("rm", sub)) => remove(conn, sub),
        _ => Ok(()),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item = NewItem::from_raw(
        required(sub, "type")?,
        required(sub, "amount")?,
        required(sub, "date")?,
        required(sub, "category")?,
    )?;
    let created = store::create(conn, item)?;
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        created.r#type,
        created.amount,
        created.date.date_naive(),
        created.category,
        created.id
    );
    Ok(())
}

fn get(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    let item = store::get(conn, id)?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

#[derive(Serialize)]
struct ItemPage<'a> {
    items: &'a [Item],
    total: u64,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let request = list_request(sub)?;
    let (items, total) = store::list(conn, &request)?;
    if sub.get_flag("jsonl") {
        maybe_print_json(false, true, &items)?;
        return Ok(());
    }
    if !maybe_print_json(sub.get_flag("json"), false, &ItemPage { items: &items, total })? {
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Type", "Amount", "Category"], item_rows(&items))
        );
        println!("Total: {total} (sorted by {})", request.sort);
    }
    Ok(())
}

pub fn item_rows(items: &[Item]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                item.r#type.to_string(),
                item.amount.to_string(),
                item.category.clone(),
            ]
        })
        .collect()
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    let field = |name: &str| sub.get_one::<String>(name).map(String::as_str);
    let patch = ItemPatch::from_raw(
        field("type"),
        field("amount"),
        field("date"),
        field("category"),
    )?;
    if patch.is_empty() {
        bail!("Nothing to update: pass at least one of --type, --amount, --date, --category");
    }
    let updated = store::update(conn, id, patch)?;
    println!("Updated {} at {}", updated.id, updated.updated_at.to_rfc3339());
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(required(sub, "id")?)?;
    store::delete(conn, id)?;
    println!("Deleted {id}");
    Ok(())
}
