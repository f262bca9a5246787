// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use ledgerlens::{cli, commands, config::Settings, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut settings = Settings::load()?;
    if let Some(path) = matches.get_one::<String>("db") {
        settings.database.path = Some(PathBuf::from(path));
    }
    if let Some(level) = matches.get_one::<String>("log_level") {
        settings.log.level = level.clone();
    }
    logging::init(&settings.log.level)?;

    let db_path = settings.database_path()?;
    let mut conn = db::open(&db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db_path.display());
        }
        Some(("item", sub)) => commands::items::handle(&conn, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
