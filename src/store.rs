// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CRUD access to the `items` table.
//!
//! Each mutation is a single statement (or, for [`create_many`], a single
//! transaction), so a failure never leaves a partial write behind.
//! `created_at`/`updated_at` are written by SQLite itself.

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::db::{format_timestamp, timestamp_column, uuid_column};
use crate::error::{EngineError, Result};
use crate::models::{Item, ItemPatch, NewItem};
use crate::query::{Fragment, ListRequest, Predicate, Sort};

const ITEM_COLUMNS: &str = "id, type, amount, date, category, created_at, updated_at";

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: uuid_column(row, 0)?,
        r#type: row.get(1)?,
        amount: row.get(2)?,
        date: timestamp_column(row, 3)?,
        category: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
        updated_at: timestamp_column(row, 6)?,
    })
}

pub fn create(conn: &Connection, item: NewItem) -> Result<Item> {
    let id = Uuid::new_v4();
    let created = conn.query_row(
        &format!(
            "INSERT INTO items(id, type, amount, date, category) VALUES (?1, ?2, ?3, ?4, ?5) \
             RETURNING {ITEM_COLUMNS}"
        ),
        params![
            id.to_string(),
            item.r#type,
            item.amount,
            format_timestamp(&item.date),
            item.category
        ],
        row_to_item,
    )?;
    tracing::info!(id = %created.id, kind = %created.r#type, "created item");
    Ok(created)
}

/// Inserts every item or none of them.
pub fn create_many(conn: &mut Connection, items: Vec<NewItem>) -> Result<Vec<Item>> {
    let tx = conn.transaction()?;
    let mut created = Vec::with_capacity(items.len());
    for item in items {
        created.push(create(&tx, item)?);
    }
    tx.commit()?;
    Ok(created)
}

pub fn get(conn: &Connection, id: Uuid) -> Result<Item> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
        params![id.to_string()],
        row_to_item,
    )
    .optional()?
    .ok_or(EngineError::NotFound(id))
}

/// Returns the filtered, sorted items and how many items match the filter.
///
/// Count and select share one read transaction so the total agrees with the
/// rows returned.
pub fn list(conn: &Connection, request: &ListRequest) -> Result<(Vec<Item>, u64)> {
    let fragment = Predicate::from_filter(&request.filter).render();
    let tx = conn.unchecked_transaction()?;
    let total: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM items {}", fragment.sql),
        fragment.params(),
        |r| r.get(0),
    )?;
    let items = select_items(&tx, &fragment, &request.sort)?;
    tx.commit()?;
    Ok((items, total.unsigned_abs()))
}

pub fn list_for_export(conn: &Connection, request: &ListRequest) -> Result<Vec<Item>> {
    let fragment = Predicate::from_filter(&request.filter).render();
    select_items(conn, &fragment, &request.sort)
}

fn select_items(conn: &Connection, fragment: &Fragment, sort: &Sort) -> Result<Vec<Item>> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM items {} {}",
        fragment.sql,
        sort.order_clause()
    );
    tracing::debug!(%sql, args = fragment.args.len(), "selecting items");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(fragment.params(), row_to_item)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Applies the fields present in `patch`; absent fields keep their stored
/// value. `updated_at` never moves behind `created_at`.
pub fn update(conn: &Connection, id: Uuid, patch: ItemPatch) -> Result<Item> {
    let updated = conn
        .query_row(
            &format!(
                "UPDATE items SET
                    type = COALESCE(?2, type),
                    amount = COALESCE(?3, amount),
                    date = COALESCE(?4, date),
                    category = COALESCE(?5, category),
                    updated_at = max(created_at, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 WHERE id = ?1
                 RETURNING {ITEM_COLUMNS}"
            ),
            params![
                id.to_string(),
                patch.r#type,
                patch.amount,
                patch.date.as_ref().map(format_timestamp),
                patch.category
            ],
            row_to_item,
        )
        .optional()?
        .ok_or(EngineError::NotFound(id))?;
    tracing::info!(id = %id, "updated item");
    Ok(updated)
}

pub fn delete(conn: &Connection, id: Uuid) -> Result<()> {
    let removed = conn.execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])?;
    if removed == 0 {
        return Err(EngineError::NotFound(id));
    }
    tracing::info!(id = %id, "deleted item");
    Ok(())
}
