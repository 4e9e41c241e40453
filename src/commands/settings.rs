// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_currency_symbol, set_currency_symbol};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("currency", sub)) = m.subcommand() {
        match sub.get_one::<String>("symbol").map(|s| s.trim()) {
            Some("") => return Err(anyhow!("Currency symbol must not be empty")),
            Some(sym) => {
                set_currency_symbol(conn, sym)?;
                println!("Currency symbol set to '{}'", sym);
            }
            None => println!("{}", get_currency_symbol(conn)?),
        }
    }
    Ok(())
}
