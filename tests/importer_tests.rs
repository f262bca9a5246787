// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerlens::query::ListRequest;
use ledgerlens::{cli, commands::importer, db, store};
use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::prepare(&conn).unwrap();
    conn
}

fn import(conn: &mut Connection, contents: &str, padded: bool) -> anyhow::Result<()> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let arg = if padded { format!("  {path}  ") } else { path };
    let matches = cli::build_cli().get_matches_from(["ledgerlens", "import", "items", &arg]);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    importer::handle(conn, import_m)
}

fn stored_count(conn: &Connection) -> u64 {
    store::list(conn, &ListRequest::default()).unwrap().1
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    import(
        &mut conn,
        "type,amount,date,category\nexpense,-5.00,2025-02-03,Shopping\n",
        true,
    )
    .unwrap();
    assert_eq!(stored_count(&conn), 1);
}

#[test]
fn importer_validates_and_trims_fields() {
    let mut conn = base_conn();
    import(
        &mut conn,
        "type,amount,date,category\n Income , 1200.50 ,2025-02-01T09:00:00+01:00, Salary \n",
        false,
    )
    .unwrap();
    let (items, _) = store::list(&conn, &ListRequest::default()).unwrap();
    assert_eq!(items[0].amount.to_string(), "1200.50");
    assert_eq!(items[0].category, "Salary");
    assert_eq!(items[0].date.to_rfc3339(), "2025-02-01T08:00:00+00:00");
}

#[test]
fn one_bad_row_rejects_the_whole_file() {
    let mut conn = base_conn();
    let err = import(
        &mut conn,
        "type,amount,date,category\n\
         income,10.00,2025-01-01,Salary\n\
         expense,1.234,2025-01-02,Food\n",
        false,
    )
    .unwrap_err();
    assert!(err.to_string().contains("line 3"), "{err:#}");
    assert_eq!(stored_count(&conn), 0);
}

#[test]
fn header_order_does_not_matter() {
    let items = importer::read_items(
        "category,date,amount,type\nFood,2025-01-02,3.50,expense\n".as_bytes(),
    )
    .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].amount.minor_units(), 350);
}
