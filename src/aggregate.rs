// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation over a snapshot of transactions.
//!
//! Nothing here touches the store or fails: a record whose amount could not
//! be read already carries zero, a record without a valid date simply never
//! lands in a month or year window, and sums never overflow.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::format::month_name;
use crate::models::{
    CategorySummary, DashboardMetrics, MonthlySummary, Totals, Transaction, TxType,
};

pub const DEFAULT_TOP_CATEGORIES: usize = 10;

/// Adds `amount` into `acc`. A sum that would overflow keeps the previous
/// value and logs the offending record instead of panicking.
fn accumulate(acc: &mut Decimal, amount: Decimal, id: i64) {
    match acc.checked_add(amount) {
        Some(sum) => *acc = sum,
        None => warn!(id, %amount, "sum would overflow, leaving the amount out"),
    }
}

fn balance_of(income: Decimal, expense: Decimal) -> Decimal {
    income.checked_sub(expense).unwrap_or_else(|| {
        warn!(%income, %expense, "balance would overflow, clamping it");
        if income > expense {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

pub fn totals_by_type(transactions: &[Transaction]) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions {
        match t.r#type {
            TxType::Income => accumulate(&mut income, t.amount, t.id),
            TxType::Expense => accumulate(&mut expense, t.amount, t.id),
        }
    }
    Totals {
        income_total: income,
        expense_total: expense,
        balance: balance_of(income, expense),
    }
}

pub fn filter_year(transactions: &[Transaction], year: i32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.in_year(year))
        .cloned()
        .collect()
}

pub fn filter_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.in_month(year, month))
        .cloned()
        .collect()
}

/// Twelve summaries, January to December, zero-filled for empty months.
pub fn monthly_breakdown(transactions: &[Transaction], year: i32) -> Vec<MonthlySummary> {
    (1..=12)
        .map(|month| {
            let in_month = filter_month(transactions, year, month);
            let totals = totals_by_type(&in_month);
            MonthlySummary {
                month,
                period_label: month_name(month).to_string(),
                income_total: totals.income_total,
                expense_total: totals.expense_total,
                balance: totals.balance,
            }
        })
        .collect()
}

/// Cumulative balance at the end of each month of `monthly`.
pub fn running_balances(monthly: &[MonthlySummary]) -> Vec<Decimal> {
    monthly
        .iter()
        .scan(Decimal::ZERO, |acc, m| {
            *acc = acc.saturating_add(m.balance);
            Some(*acc)
        })
        .collect()
}

/// Per-month average of a yearly total.
pub fn monthly_average(totals: &Totals) -> Totals {
    let months = Decimal::from(12);
    Totals {
        income_total: totals.income_total / months,
        expense_total: totals.expense_total / months,
        balance: totals.balance / months,
    }
}

/// Buckets keyed by `(category, type)`, largest total first. Equal totals keep
/// the order in which their category was first seen.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut index: HashMap<(&str, TxType), usize> = HashMap::new();
    let mut buckets: Vec<CategorySummary> = Vec::new();

    for t in transactions {
        let key = (t.category.as_str(), t.r#type);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(CategorySummary {
                category: t.category.clone(),
                r#type: t.r#type,
                count: 0,
                total: Decimal::ZERO,
                percent_of_total: 0.0,
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.count += 1;
        accumulate(&mut bucket.total, t.amount, t.id);
    }

    let grand_total = buckets
        .iter()
        .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b.total));
    match grand_total {
        Some(grand_total) if grand_total.is_zero() => {}
        Some(grand_total) => {
            for b in buckets.iter_mut() {
                b.percent_of_total = (b.total / grand_total * Decimal::ONE_HUNDRED)
                    .to_f64()
                    .unwrap_or(0.0);
            }
        }
        None => {
            warn!("category grand total overflows, computing shares approximately");
            let grand_total: f64 = buckets.iter().filter_map(|b| b.total.to_f64()).sum();
            for b in buckets.iter_mut() {
                b.percent_of_total = b.total.to_f64().unwrap_or(0.0) / grand_total * 100.0;
            }
        }
    }

    buckets.sort_by(|a, b| b.total.cmp(&a.total));
    buckets
}

pub fn top_categories(transactions: &[Transaction], limit: usize) -> Vec<CategorySummary> {
    let mut all = category_breakdown(transactions);
    all.truncate(limit);
    all
}

/// Figures shown on the dashboard: all-time balance, the month containing
/// `today`, and the twelve months of `year`.
pub fn dashboard_metrics(
    transactions: &[Transaction],
    today: NaiveDate,
    year: i32,
) -> DashboardMetrics {
    let current_month = filter_month(transactions, today.year(), today.month());
    DashboardMetrics {
        current_balance: totals_by_type(transactions).balance,
        month: totals_by_type(&current_month),
        yearly: monthly_breakdown(transactions, year),
    }
}
