// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display helpers shared by the report builder and the command layer.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::TxDate;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const INVALID_DATE_LABEL: &str = "invalid date";

/// Full English month name for `month` in 1..=12.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

/// `R$ 1,234.56` style amount with thousands separators and two decimals.
pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    let rounded = d.round_dp(2);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    if symbol.is_empty() {
        format!("{}{}.{}", sign, grouped, frac_part)
    } else {
        format!("{} {}{}.{}", symbol, sign, grouped, frac_part)
    }
}

pub fn fmt_percent(p: f64) -> String {
    format!("{:.1}%", p)
}

pub fn fmt_date(d: &NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

pub fn fmt_tx_date(d: &TxDate) -> String {
    match d {
        TxDate::Valid(d) => fmt_date(d),
        TxDate::Invalid(_) => INVALID_DATE_LABEL.to_string(),
    }
}

pub fn fmt_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Cut `text` to at most `width` graphemes, ending in `...` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.graphemes(true).count() <= width {
        return text.to_string();
    }
    let kept: String = text.graphemes(true).take(width).collect();
    kept + "..."
}
