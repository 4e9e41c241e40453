// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use crate::aggregate::{
    DEFAULT_TOP_CATEGORIES, dashboard_metrics, running_balances, top_categories,
};
use crate::format::{fmt_money, fmt_percent};
use crate::models::DashboardMetrics;
use crate::render::{OutputFormat, renderer_for, save_report};
use crate::report::{ReportBuilder, ReportOptions};
use crate::store::{Ledger, TxFilter};
use crate::utils::{get_currency_symbol, maybe_print_json, parse_month, parse_year, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local, NaiveDateTime};
use rusqlite::Connection;
use tracing::info;

pub fn handle(
    conn: &Connection,
    ledger: &Ledger,
    out_dir: &Path,
    m: &clap::ArgMatches,
) -> Result<()> {
    let now = Local::now().naive_local();
    match m.subcommand() {
        Some(("monthly", sub)) => {
            let path = monthly(conn, ledger, out_dir, now, sub)?;
            println!("Report written to {}", path.display());
        }
        Some(("annual", sub)) => {
            let path = annual(conn, ledger, out_dir, now, sub)?;
            println!("Report written to {}", path.display());
        }
        Some(("dashboard", sub)) => dashboard(conn, ledger, now, sub)?,
        Some(("categories", sub)) => categories(conn, ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn report_options(conn: &Connection) -> Result<ReportOptions> {
    Ok(ReportOptions {
        currency_symbol: get_currency_symbol(conn)?,
        ..ReportOptions::default()
    })
}

fn output_target(out_dir: &Path, sub: &clap::ArgMatches) -> Result<(OutputFormat, PathBuf)> {
    let format = sub
        .get_one::<String>("format")
        .map(|s| s.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or(OutputFormat::Text);
    let dir = sub
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| out_dir.to_path_buf());
    Ok((format, dir))
}

pub fn monthly(
    conn: &Connection,
    ledger: &Ledger,
    out_dir: &Path,
    now: NaiveDateTime,
    sub: &clap::ArgMatches,
) -> Result<PathBuf> {
    let (year, month) = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let (format, dir) = output_target(out_dir, sub)?;

    let transactions = ledger.list_transactions(&TxFilter::month(year, month))?;
    info!(year, month, rows = transactions.len(), %format, "building monthly report");

    let builder = ReportBuilder::new(report_options(conn)?, now);
    let report = builder.build_monthly_report(&transactions, year, month);
    let renderer = renderer_for(format);
    save_report(renderer.as_ref(), &report, &dir)
        .with_context(|| format!("Generate monthly report for {:04}-{:02}", year, month))
}

pub fn annual(
    conn: &Connection,
    ledger: &Ledger,
    out_dir: &Path,
    now: NaiveDateTime,
    sub: &clap::ArgMatches,
) -> Result<PathBuf> {
    let year = parse_year(sub.get_one::<String>("year").context("--year is required")?)?;
    let (format, dir) = output_target(out_dir, sub)?;

    let mut options = report_options(conn)?;
    if sub.get_flag("all") {
        options.annual_detail_limit = None;
    } else if let Some(n) = sub.get_one::<usize>("detail_limit") {
        options.annual_detail_limit = Some(*n);
    }

    let transactions = ledger.list_transactions(&TxFilter::year(year))?;
    info!(year, rows = transactions.len(), %format, "building annual report");

    let builder = ReportBuilder::new(options, now);
    let report = builder.build_annual_report(&transactions, year);
    let renderer = renderer_for(format);
    save_report(renderer.as_ref(), &report, &dir)
        .with_context(|| format!("Generate annual report for {}", year))
}

pub fn dashboard_data(
    ledger: &Ledger,
    now: NaiveDateTime,
    year: Option<i32>,
) -> Result<DashboardMetrics> {
    let all = ledger.list_transactions(&TxFilter::default())?;
    let today = now.date();
    Ok(dashboard_metrics(&all, today, year.unwrap_or(today.year())))
}

fn dashboard(
    conn: &Connection,
    ledger: &Ledger,
    now: NaiveDateTime,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let year = sub
        .get_one::<String>("year")
        .map(|s| parse_year(s))
        .transpose()?;
    let metrics = dashboard_data(ledger, now, year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &metrics)? {
        return Ok(());
    }

    let sym = get_currency_symbol(conn)?;
    println!(
        "{}",
        pretty_table(
            &["", "Amount"],
            vec![
                vec!["Current balance".into(), fmt_money(&metrics.current_balance, &sym)],
                vec!["Income this month".into(), fmt_money(&metrics.month.income_total, &sym)],
                vec!["Expense this month".into(), fmt_money(&metrics.month.expense_total, &sym)],
                vec!["Balance this month".into(), fmt_money(&metrics.month.balance, &sym)],
            ],
        )
    );
    let running = running_balances(&metrics.yearly);
    let rows: Vec<Vec<String>> = metrics
        .yearly
        .iter()
        .zip(running.iter())
        .map(|(m, acc)| {
            vec![
                m.period_label.clone(),
                fmt_money(&m.income_total, &sym),
                fmt_money(&m.expense_total, &sym),
                fmt_money(&m.balance, &sym),
                fmt_money(acc, &sym),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Balance", "Running"], rows)
    );
    Ok(())
}

fn categories(conn: &Connection, ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let mut filter = TxFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        filter.month = Some(parse_month(month)?);
    }
    if let Some(year) = sub.get_one::<String>("year") {
        filter.year = Some(parse_year(year)?);
    }
    let top = sub
        .get_one::<usize>("top")
        .copied()
        .unwrap_or(DEFAULT_TOP_CATEGORIES);

    let transactions = ledger.list_transactions(&filter)?;
    let summaries = top_categories(&transactions, top);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summaries)? {
        let sym = get_currency_symbol(conn)?;
        let rows: Vec<Vec<String>> = summaries
            .iter()
            .enumerate()
            .map(|(i, s)| {
                vec![
                    (i + 1).to_string(),
                    s.category.clone(),
                    s.r#type.label().into(),
                    s.count.to_string(),
                    fmt_money(&s.total, &sym),
                    fmt_percent(s.percent_of_total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["#", "Category", "Type", "Count", "Total", "Share"], rows)
        );
    }
    Ok(())
}
