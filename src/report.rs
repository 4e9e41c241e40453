// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Assembles monthly and annual reports as ordered section descriptors.
//!
//! A [`Report`] says nothing about fonts or page geometry beyond loose
//! [`StyleHints`]; laying it out is the job of a [`crate::render::Renderer`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{
    DEFAULT_TOP_CATEGORIES, category_breakdown, filter_month, filter_year, monthly_average,
    monthly_breakdown, running_balances, top_categories, totals_by_type,
};
use crate::format::{fmt_money, fmt_percent, fmt_timestamp, fmt_tx_date, month_name, truncate};
use crate::models::{CategorySummary, Totals, Transaction, TxDate};

pub const NO_DATA_PLACEHOLDER: &str = "No transactions for this period.";
pub const NO_CATEGORIES_PLACEHOLDER: &str = "No categories for this period.";
pub const DEFAULT_ANNUAL_DETAIL_LIMIT: usize = 20;
pub const DEFAULT_DESCRIPTION_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Monthly { year: i32, month: u32 },
    Annual { year: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Summary,
    AnnualSummary,
    CategoryBreakdown,
    MonthlyEvolution,
    TopCategories,
    DetailedTransactions,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Positive,
    Negative,
}

impl Tone {
    fn of_balance(d: &Decimal) -> Self {
        if d.is_sign_negative() && !d.is_zero() {
            Tone::Negative
        } else {
            Tone::Positive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleHints {
    pub font_size: u8,
    pub tone: Tone,
    pub striped: bool,
}

impl StyleHints {
    fn title() -> Self {
        StyleHints {
            font_size: 20,
            tone: Tone::Neutral,
            striped: false,
        }
    }

    fn table(font_size: u8) -> Self {
        StyleHints {
            font_size,
            tone: Tone::Neutral,
            striped: true,
        }
    }

    fn text(font_size: u8, tone: Tone) -> Self {
        StyleHints {
            font_size,
            tone,
            striped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub head: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(head: &[&str]) -> Self {
        Table {
            head: head.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "content")]
pub enum Body {
    Lines(Vec<String>),
    Table(Table),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub body: Body,
    pub style: StyleHints,
}

impl Section {
    pub fn table(&self) -> Option<&Table> {
        match &self.body {
            Body::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, Body::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    /// File name without extension; renderers add their own.
    pub file_stem: String,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

pub fn monthly_file_stem(year: i32, month: u32) -> String {
    format!("cash-report-{:02}-{}", month, year)
}

pub fn annual_file_stem(year: i32) -> String {
    format!("cash-report-{}", year)
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// `None` lists every transaction of the month.
    pub monthly_detail_limit: Option<usize>,
    /// `None` lists every transaction of the year.
    pub annual_detail_limit: Option<usize>,
    pub top_categories: usize,
    pub description_width: usize,
    pub currency_symbol: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            monthly_detail_limit: None,
            annual_detail_limit: Some(DEFAULT_ANNUAL_DETAIL_LIMIT),
            top_categories: DEFAULT_TOP_CATEGORIES,
            description_width: DEFAULT_DESCRIPTION_WIDTH,
            currency_symbol: "$".to_string(),
        }
    }
}

pub struct ReportBuilder {
    options: ReportOptions,
    generated_at: NaiveDateTime,
}

impl ReportBuilder {
    pub fn new(options: ReportOptions, generated_at: NaiveDateTime) -> Self {
        ReportBuilder {
            options,
            generated_at,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn build_monthly_report(
        &self,
        transactions: &[Transaction],
        year: i32,
        month: u32,
    ) -> Report {
        let in_month = filter_month(transactions, year, month);
        let listed = with_undated(&in_month, transactions);
        let title = "Monthly Cash Flow Report".to_string();
        let period = format!("{} {}", month_name(month), year);

        let sections = vec![
            self.header(&title, &period),
            self.summary(
                SectionKind::Summary,
                "Summary",
                &totals_by_type(&in_month),
                None,
            ),
            self.category_section(
                SectionKind::CategoryBreakdown,
                "Category Breakdown",
                &category_breakdown(&in_month),
            ),
            self.detail(&listed, self.options.monthly_detail_limit),
            self.footer(listed.len()),
        ];

        Report {
            kind: ReportKind::Monthly { year, month },
            title,
            file_stem: monthly_file_stem(year, month),
            sections,
        }
    }

    pub fn build_annual_report(&self, transactions: &[Transaction], year: i32) -> Report {
        let in_year = filter_year(transactions, year);
        let listed = with_undated(&in_year, transactions);
        let title = "Annual Cash Flow Report".to_string();
        let totals = totals_by_type(&in_year);

        let sections = vec![
            self.header(&title, &format!("Year {}", year)),
            self.summary(
                SectionKind::AnnualSummary,
                "Annual Summary",
                &totals,
                Some(&monthly_average(&totals)),
            ),
            self.evolution(&in_year, year),
            self.category_section(
                SectionKind::TopCategories,
                "Top Categories",
                &top_categories(&in_year, self.options.top_categories),
            ),
            self.detail(&listed, self.options.annual_detail_limit),
            self.footer(listed.len()),
        ];

        Report {
            kind: ReportKind::Annual { year },
            title,
            file_stem: annual_file_stem(year),
            sections,
        }
    }

    fn money(&self, d: &Decimal) -> String {
        fmt_money(d, &self.options.currency_symbol)
    }

    fn header(&self, title: &str, period: &str) -> Section {
        Section {
            kind: SectionKind::Header,
            title: title.to_string(),
            body: Body::Lines(vec![
                format!("Period: {}", period),
                format!("Generated at: {}", fmt_timestamp(&self.generated_at)),
            ]),
            style: StyleHints::title(),
        }
    }

    fn summary(
        &self,
        kind: SectionKind,
        title: &str,
        totals: &Totals,
        average: Option<&Totals>,
    ) -> Section {
        let mut table = Table::new(&["", "Amount"]);
        table.rows.push(vec![
            "Total income".into(),
            self.money(&totals.income_total),
        ]);
        table.rows.push(vec![
            "Total expense".into(),
            self.money(&totals.expense_total),
        ]);
        table
            .rows
            .push(vec!["Balance".into(), self.money(&totals.balance)]);
        if let Some(avg) = average {
            table.rows.push(vec![
                "Monthly average income".into(),
                self.money(&avg.income_total),
            ]);
            table.rows.push(vec![
                "Monthly average expense".into(),
                self.money(&avg.expense_total),
            ]);
            table.rows.push(vec![
                "Monthly average balance".into(),
                self.money(&avg.balance),
            ]);
        }
        Section {
            kind,
            title: title.to_string(),
            body: Body::Table(table),
            style: StyleHints::text(12, Tone::of_balance(&totals.balance)),
        }
    }

    fn evolution(&self, in_year: &[Transaction], year: i32) -> Section {
        let monthly = monthly_breakdown(in_year, year);
        let running = running_balances(&monthly);
        let mut table = Table::new(&["Month", "Income", "Expense", "Balance", "Running balance"]);
        for (m, acc) in monthly.iter().zip(running.iter()) {
            table.rows.push(vec![
                m.period_label.clone(),
                self.money(&m.income_total),
                self.money(&m.expense_total),
                self.money(&m.balance),
                self.money(acc),
            ]);
        }
        Section {
            kind: SectionKind::MonthlyEvolution,
            title: "Monthly Evolution".into(),
            body: Body::Table(table),
            style: StyleHints::table(10),
        }
    }

    fn category_section(
        &self,
        kind: SectionKind,
        title: &str,
        summaries: &[CategorySummary],
    ) -> Section {
        let body = if summaries.is_empty() {
            Body::Placeholder(NO_CATEGORIES_PLACEHOLDER.into())
        } else {
            let mut table = Table::new(&["#", "Category", "Type", "Count", "Total", "Share"]);
            for (rank, s) in summaries.iter().enumerate() {
                table.rows.push(vec![
                    (rank + 1).to_string(),
                    s.category.clone(),
                    s.r#type.label().to_string(),
                    s.count.to_string(),
                    self.money(&s.total),
                    fmt_percent(s.percent_of_total),
                ]);
            }
            Body::Table(table)
        };
        Section {
            kind,
            title: title.to_string(),
            body,
            style: StyleHints::table(10),
        }
    }

    fn detail(&self, in_window: &[Transaction], limit: Option<usize>) -> Section {
        let title = match limit {
            Some(n) => format!("Detailed Transactions (latest {})", n),
            None => "Detailed Transactions".to_string(),
        };
        let body = if in_window.is_empty() {
            Body::Placeholder(NO_DATA_PLACEHOLDER.into())
        } else {
            let mut rows: Vec<&Transaction> = in_window.iter().collect();
            sort_newest_first(&mut rows);
            if let Some(n) = limit {
                rows.truncate(n);
            }
            let mut table = Table::new(&["Date", "Type", "Category", "Description", "Amount"]);
            for t in rows {
                table.rows.push(vec![
                    fmt_tx_date(&t.date),
                    t.r#type.label().to_string(),
                    t.category.clone(),
                    truncate(&t.description, self.options.description_width),
                    self.money(&t.amount),
                ]);
            }
            Body::Table(table)
        };
        Section {
            kind: SectionKind::DetailedTransactions,
            title,
            body,
            style: StyleHints::table(8),
        }
    }

    fn footer(&self, count: usize) -> Section {
        Section {
            kind: SectionKind::Footer,
            title: String::new(),
            body: Body::Lines(vec![format!(
                "{} transaction(s) in period. Generated by cashtrack {}.",
                count,
                env!("CARGO_PKG_VERSION")
            )]),
            style: StyleHints::text(8, Tone::Neutral),
        }
    }
}

/// Rows of the window plus every row of `fetched` whose date is unreadable.
/// Those never land in a month or year bucket, but the detail listing and the
/// footer still account for them.
fn with_undated(in_window: &[Transaction], fetched: &[Transaction]) -> Vec<Transaction> {
    let mut listed = in_window.to_vec();
    listed.extend(
        fetched
            .iter()
            .filter(|t| matches!(t.date, TxDate::Invalid(_)))
            .cloned(),
    );
    listed
}

/// Date descending; undated rows go last. The sort is stable so rows sharing
/// a date keep the order the store returned them in.
pub fn sort_newest_first(rows: &mut [&Transaction]) {
    rows.sort_by(|a, b| match (a.date.date(), b.date.date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
