// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::format::{fmt_money, fmt_tx_date};
use crate::models::{NewTransaction, Transaction, TransactionPatch, TxType};
use crate::store::{Ledger, TxFilter};
use crate::utils::{
    get_currency_symbol, maybe_print_json, parse_amount, parse_date, parse_month, parse_year,
    pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

/// Rows per page of `tx list --page`.
pub const PAGE_SIZE: usize = 10;

pub fn handle(conn: &Connection, ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, ledger, sub)?,
        Some(("list", sub)) => list(conn, ledger, sub)?,
        Some(("edit", sub)) => edit(conn, ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        Some(("clear", sub)) => clear(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<TxType> {
    s.parse::<TxType>().map_err(|e| anyhow!(e))
}

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    sub.get_one::<String>(name)
        .with_context(|| format!("--{} is required", name))
}

fn add(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let tx = NewTransaction {
        date: parse_date(required(sub, "date")?)?,
        r#type: parse_type(required(sub, "type")?)?,
        category: required(sub, "category")?.to_string(),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        amount: parse_amount(required(sub, "amount")?)?,
    };
    let saved = ledger.add_transaction(&tx).context("Add transaction")?;
    let sym = get_currency_symbol(conn)?;
    println!(
        "Recorded #{}: {} {} on {} ({})",
        saved.id,
        saved.r#type,
        fmt_money(&saved.amount, &sym),
        fmt_tx_date(&saved.date),
        saved.category
    );
    Ok(())
}

fn edit(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id is required")?;
    let patch = TransactionPatch {
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        r#type: sub.get_one::<String>("type").map(|s| parse_type(s)).transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_amount(s))
            .transpose()?,
    };
    let saved = ledger
        .update_transaction(id, &patch)
        .with_context(|| format!("Update transaction {}", id))?;
    let sym = get_currency_symbol(conn)?;
    println!(
        "Updated #{}: {} {} on {} ({})",
        saved.id,
        saved.r#type,
        fmt_money(&saved.amount, &sym),
        fmt_tx_date(&saved.date),
        saved.category
    );
    Ok(())
}

fn rm(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("id is required")?;
    ledger
        .delete_transaction(id)
        .with_context(|| format!("Delete transaction {}", id))?;
    println!("Removed transaction #{}", id);
    Ok(())
}

fn clear(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        return Err(anyhow!(
            "Refusing to delete every transaction without --yes; this cannot be undone"
        ));
    }
    let removed = ledger.clear_transactions()?;
    println!("Removed {} transaction(s)", removed);
    Ok(())
}

fn list(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let sym = get_currency_symbol(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    fmt_tx_date(&t.date),
                    t.r#type.label().to_string(),
                    t.category.clone(),
                    t.description.clone(),
                    fmt_money(&t.amount, &sym),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Description", "Amount"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn filter_from_matches(sub: &clap::ArgMatches) -> Result<TxFilter> {
    let mut filter = TxFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        filter.month = Some(parse_month(month)?);
    }
    if let Some(year) = sub.get_one::<String>("year") {
        filter.year = Some(parse_year(year)?);
    }
    if let Some(t) = sub.get_one::<String>("type") {
        filter.r#type = Some(parse_type(t)?);
    }
    filter.category = sub.get_one::<String>("category").cloned();
    if let Some(page) = sub.get_one::<usize>("page") {
        if *page == 0 {
            return Err(anyhow!("Pages start at 1"));
        }
        filter.limit = Some(PAGE_SIZE);
        filter.offset = (page - 1)
            .checked_mul(PAGE_SIZE)
            .ok_or_else(|| anyhow!("Page {} is out of range", page))?;
    } else if let Some(limit) = sub.get_one::<usize>("limit") {
        filter.limit = Some(*limit);
    }
    Ok(filter)
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from_matches(sub)?;
    Ok(ledger.list_transactions(&filter)?)
}
