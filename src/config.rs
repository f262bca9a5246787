// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Layered settings: built-in defaults, then `ledgerlens.toml` in the
//! platform config dir, then `LEDGERLENS__SECTION__KEY` environment
//! variables. CLI flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::db;

pub const CONFIG_FILE: &str = "ledgerlens.toml";
pub const ENV_PREFIX: &str = "LEDGERLENS";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let file = db::project_dirs()
            .ok()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE));
        Self::load_from(file.as_deref())
    }

    /// `file` is optional: a missing file is skipped, a malformed one is an error.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().set_default("log.level", "info")?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to load settings")?;
        settings
            .try_deserialize()
            .context("Failed to parse settings")
    }

    /// Configured path, or `<data_dir>/ledgerlens.sqlite`.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => db::default_db_path(),
        }
    }
}
