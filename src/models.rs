// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TxType::Income => "Income",
            TxType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TxType::Income),
            "expense" | "out" => Ok(TxType::Expense),
            other => Err(format!("Invalid transaction type '{}', expected income|expense", other)),
        }
    }
}

/// Date of a stored transaction. Rows whose stored date cannot be parsed keep
/// the raw text so they can still be listed and counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxDate {
    Valid(NaiveDate),
    Invalid(String),
}

impl TxDate {
    pub fn parse(raw: &str) -> Self {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => TxDate::Valid(d),
            Err(_) => TxDate::Invalid(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TxDate::Valid(d) => Some(*d),
            TxDate::Invalid(_) => None,
        }
    }

    pub fn in_year(&self, year: i32) -> bool {
        self.date().is_some_and(|d| d.year() == year)
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date()
            .is_some_and(|d| d.year() == year && d.month() == month)
    }
}

impl From<NaiveDate> for TxDate {
    fn from(d: NaiveDate) -> Self {
        TxDate::Valid(d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub date: TxDate,
    pub r#type: TxType,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
}

/// Largest amount a single transaction may carry (one quadrillion). Sums of
/// amounts under this ceiling stay far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Fields for a new transaction; the store assigns `id` and `owner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub r#type: TxType,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub r#type: Option<TxType>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.r#type.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.amount.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub r#type: TxType,
}

/// Categories offered to every user before they define their own.
pub const PRESET_INCOME_CATEGORIES: &[&str] =
    &["Salary", "Freelance", "Sales", "Investments", "Other"];
pub const PRESET_EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Housing",
    "Health",
    "Education",
    "Leisure",
    "Other",
];

pub fn preset_categories(t: TxType) -> &'static [&'static str] {
    match t {
        TxType::Income => PRESET_INCOME_CATEGORIES,
        TxType::Expense => PRESET_EXPENSE_CATEGORIES,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub period_label: String,
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub r#type: TxType,
    pub count: usize,
    pub total: Decimal,
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub current_balance: Decimal,
    pub month: Totals,
    pub yearly: Vec<MonthlySummary>,
}
