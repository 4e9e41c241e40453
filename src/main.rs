// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use chrono::Local;
use tracing::info;

use cashtrack::config::{Config, Overrides};
use cashtrack::format::fmt_money;
use cashtrack::store::Ledger;
use cashtrack::{cli, commands, db, logging, utils};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init(matches.get_count("verbose"));

    let config = Config::load(Overrides::from_matches(&matches))?;
    let conn = db::open_or_init(&config.db_path)?;
    let mut ledger = Ledger::new(&conn, config.owner.clone());

    let stale = Rc::new(Cell::new(false));
    {
        let stale = Rc::clone(&stale);
        ledger.notifier_mut().subscribe(move |change| {
            info!(?change, "data changed");
            if change.touches_transactions() {
                stale.set(true);
            }
        });
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, &ledger, sub)?,
        Some(("category", sub)) => commands::categories::handle(&ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &ledger, &config.out_dir, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if stale.get() {
        let now = Local::now().naive_local();
        let metrics = commands::reports::dashboard_data(&ledger, now, None)?;
        let sym = utils::get_currency_symbol(&conn)?;
        println!(
            "This month: income {}, expense {}, balance {} (overall {})",
            fmt_money(&metrics.month.income_total, &sym),
            fmt_money(&metrics.month.expense_total, &sym),
            fmt_money(&metrics.month.balance, &sym),
            fmt_money(&metrics.current_balance, &sym),
        );
    }
    Ok(())
}
