// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::DateTime;
use rusqlite::Connection;

use crate::models::{ItemType, MIN_CATEGORY_LEN};
use crate::utils::pretty_table;

/// `(issue, item id, detail)` for every stored row that breaks an item
/// invariant.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String, String)>> {
    let mut issues = Vec::new();
    let mut stmt = conn.prepare(
        "SELECT id, type, date, category, created_at, updated_at FROM items ORDER BY rowid",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let date: String = r.get(2)?;
        let category: String = r.get(3)?;
        let created_at: String = r.get(4)?;
        let updated_at: String = r.get(5)?;

        if kind.parse::<ItemType>().is_err() {
            issues.push(("unknown_type".into(), id.clone(), kind));
        }
        if category.trim().chars().count() < MIN_CATEGORY_LEN {
            issues.push(("short_category".into(), id.clone(), category));
        }
        let mut dates_ok = true;
        for (field, raw) in [
            ("date", &date),
            ("created_at", &created_at),
            ("updated_at", &updated_at),
        ] {
            if DateTime::parse_from_rfc3339(raw).is_err() {
                dates_ok = false;
                issues.push(("bad_date".into(), id.clone(), format!("{field}={raw}")));
            }
        }
        if dates_ok {
            let created = DateTime::parse_from_rfc3339(&created_at)?;
            let updated = DateTime::parse_from_rfc3339(&updated_at)?;
            if updated < created {
                issues.push((
                    "updated_before_created".into(),
                    id.clone(),
                    format!("{updated_at} < {created_at}"),
                ));
            }
        }
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|(issue, id, detail)| vec![issue, id, detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Item", "Detail"], rows));
    }
    Ok(())
}
