// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::db;
use crate::errors::ConfigError;

pub const ENV_DB: &str = "CASHTRACK_DB";
pub const ENV_OWNER: &str = "CASHTRACK_OWNER";
pub const ENV_OUT_DIR: &str = "CASHTRACK_OUT_DIR";

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db: Option<PathBuf>,
    pub owner: Option<String>,
    pub out_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        Overrides {
            db: m.get_one::<String>("db").map(PathBuf::from),
            owner: m.get_one::<String>("owner").cloned(),
            out_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub owner: String,
    pub out_dir: PathBuf,
}

impl Config {
    /// Resolves the configuration from flags and the process environment.
    /// Fails before any command runs if no owner is known.
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |k| std::env::var(k).ok())
    }

    pub fn resolve<F>(overrides: Overrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: String| {
            let v = v.trim().to_string();
            (!v.is_empty()).then_some(v)
        };

        let owner = overrides
            .owner
            .and_then(non_empty)
            .or_else(|| env(ENV_OWNER).and_then(non_empty))
            .ok_or(ConfigError::MissingOwner)?;

        let db_path = match overrides
            .db
            .or_else(|| env(ENV_DB).and_then(non_empty).map(PathBuf::from))
        {
            Some(p) => p,
            None => db::default_db_path()?,
        };

        let out_dir = overrides
            .out_dir
            .or_else(|| env(ENV_OUT_DIR).and_then(non_empty).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            db_path,
            owner,
            out_dir,
        })
    }
}
