// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TxType, preset_categories};
use crate::store::Ledger;
use crate::utils::pretty_table;
use anyhow::{Context, Result, anyhow};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").context("name is required")?;
            let typ = parse_type(sub.get_one::<String>("type").context("--type is required")?)?;
            let cat = ledger.add_category(name, typ)?;
            println!("Added {} category '{}' (#{})", typ, cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let typ = sub
                .get_one::<String>("type")
                .map(|s| parse_type(s))
                .transpose()?;
            let types = match typ {
                Some(t) => vec![t],
                None => vec![TxType::Income, TxType::Expense],
            };
            let mut data = Vec::new();
            for t in &types {
                for name in preset_categories(*t) {
                    data.push(vec![String::new(), name.to_string(), t.label().into(), "preset".into()]);
                }
            }
            for c in ledger.list_categories(typ)? {
                data.push(vec![
                    c.id.to_string(),
                    c.name,
                    c.r#type.label().into(),
                    "custom".into(),
                ]);
            }
            println!("{}", pretty_table(&["ID", "Category", "Type", "Source"], data));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("id is required")?;
            ledger.delete_category(id)?;
            println!("Removed category #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<TxType> {
    s.parse::<TxType>().map_err(|e| anyhow!(e))
}
