// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashtrack::aggregate::{
    category_breakdown, dashboard_metrics, filter_year, monthly_average, monthly_breakdown,
    running_balances, top_categories, totals_by_type,
};
use cashtrack::models::{Totals, Transaction, TxDate, TxType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: i64, date: &str, t: TxType, category: &str, amount: &str) -> Transaction {
    Transaction {
        id,
        owner: "alice".into(),
        date: TxDate::parse(date),
        r#type: t,
        category: category.into(),
        description: format!("tx {}", id),
        amount: dec(amount),
    }
}

fn scenario() -> Vec<Transaction> {
    vec![
        tx(1, "2024-01-15", TxType::Income, "Salary", "1000"),
        tx(2, "2024-01-20", TxType::Expense, "Food", "400"),
        tx(3, "2024-02-01", TxType::Expense, "Food", "100"),
    ]
}

#[test]
fn totals_of_empty_input_are_zero() {
    assert_eq!(totals_by_type(&[]), Totals::default());
}

#[test]
fn totals_balance_is_income_minus_expense() {
    let t = totals_by_type(&scenario());
    assert_eq!(t.income_total, dec("1000"));
    assert_eq!(t.expense_total, dec("500"));
    assert_eq!(t.balance, dec("500"));
}

#[test]
fn monthly_breakdown_matches_scenario() {
    let months = monthly_breakdown(&scenario(), 2024);
    assert_eq!(months.len(), 12);

    let jan = &months[0];
    assert_eq!(jan.period_label, "January");
    assert_eq!(
        (jan.income_total, jan.expense_total, jan.balance),
        (dec("1000"), dec("400"), dec("600"))
    );
    let feb = &months[1];
    assert_eq!(
        (feb.income_total, feb.expense_total, feb.balance),
        (Decimal::ZERO, dec("100"), dec("-100"))
    );
    for m in &months[2..] {
        assert!(m.income_total.is_zero() && m.expense_total.is_zero() && m.balance.is_zero());
    }
}

#[test]
fn monthly_breakdown_is_calendar_ordered_regardless_of_input_order() {
    let mut rows = scenario();
    rows.push(tx(4, "2024-12-31", TxType::Income, "Sales", "5"));
    rows.push(tx(5, "2023-12-31", TxType::Income, "Sales", "999"));
    rows.reverse();

    let months = monthly_breakdown(&rows, 2024);
    let order: Vec<u32> = months.iter().map(|m| m.month).collect();
    assert_eq!(order, (1..=12).collect::<Vec<_>>());
    assert_eq!(months[11].income_total, dec("5"));
}

#[test]
fn monthly_totals_reconcile_with_the_year() {
    let mut rows = scenario();
    rows.push(tx(4, "2024-07-04", TxType::Income, "Freelance", "250.50"));
    rows.push(tx(5, "2023-07-04", TxType::Income, "Freelance", "80"));
    rows.push(tx(6, "garbage", TxType::Income, "Freelance", "70"));

    let months = monthly_breakdown(&rows, 2024);
    let year = totals_by_type(&filter_year(&rows, 2024));
    let income: Decimal = months.iter().map(|m| m.income_total).sum();
    let expense: Decimal = months.iter().map(|m| m.expense_total).sum();
    assert_eq!(income, year.income_total);
    assert_eq!(expense, year.expense_total);
}

#[test]
fn category_breakdown_ranks_and_computes_shares() {
    let rows = vec![
        tx(1, "2024-03-01", TxType::Expense, "Food", "50"),
        tx(2, "2024-03-02", TxType::Expense, "Food", "30"),
        tx(3, "2024-03-03", TxType::Income, "Salary", "200"),
    ];
    let cats = category_breakdown(&rows);
    assert_eq!(cats.len(), 2);

    assert_eq!(cats[0].category, "Salary");
    assert_eq!(cats[0].r#type, TxType::Income);
    assert_eq!(cats[0].count, 1);
    assert_eq!(cats[0].total, dec("200"));
    assert!((cats[0].percent_of_total - 71.4).abs() < 0.05);

    assert_eq!(cats[1].category, "Food");
    assert_eq!(cats[1].count, 2);
    assert_eq!(cats[1].total, dec("80"));
    assert!((cats[1].percent_of_total - 28.6).abs() < 0.05);
}

#[test]
fn category_shares_sum_to_one_hundred() {
    let rows = vec![
        tx(1, "2024-03-01", TxType::Expense, "Food", "33.33"),
        tx(2, "2024-03-02", TxType::Expense, "Rent", "66.67"),
        tx(3, "2024-03-03", TxType::Income, "Salary", "1"),
        tx(4, "2024-03-03", TxType::Expense, "Transport", "7"),
    ];
    let sum: f64 = category_breakdown(&rows)
        .iter()
        .map(|c| c.percent_of_total)
        .sum();
    assert!((sum - 100.0).abs() < 1e-6);
}

#[test]
fn category_breakdown_of_empty_input_is_empty() {
    assert!(category_breakdown(&[]).is_empty());
}

#[test]
fn zero_total_categories_have_zero_share() {
    let rows = vec![tx(1, "2024-03-01", TxType::Expense, "Food", "0")];
    let cats = category_breakdown(&rows);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].percent_of_total, 0.0);
}

#[test]
fn same_name_with_different_type_is_a_separate_bucket() {
    let rows = vec![
        tx(1, "2024-03-01", TxType::Expense, "Other", "10"),
        tx(2, "2024-03-02", TxType::Income, "Other", "10"),
    ];
    let cats = category_breakdown(&rows);
    assert_eq!(cats.len(), 2);
    // equal totals keep first-seen order
    assert_eq!(cats[0].r#type, TxType::Expense);
    assert_eq!(cats[1].r#type, TxType::Income);
}

#[test]
fn top_categories_truncates_in_rank_order() {
    let rows: Vec<Transaction> = (1..=12)
        .map(|i| {
            tx(
                i,
                "2024-05-05",
                TxType::Expense,
                &format!("Cat{}", i),
                &i.to_string(),
            )
        })
        .collect();
    let top = top_categories(&rows, 10);
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].category, "Cat12");
    assert_eq!(top[9].category, "Cat3");
    assert_eq!(top_categories(&rows, 0).len(), 0);
}

#[test]
fn aggregation_is_idempotent() {
    let rows = scenario();
    assert_eq!(monthly_breakdown(&rows, 2024), monthly_breakdown(&rows, 2024));
    assert_eq!(category_breakdown(&rows), category_breakdown(&rows));
    assert_eq!(totals_by_type(&rows), totals_by_type(&rows));
}

#[test]
fn invalid_dates_count_in_totals_but_not_in_months() {
    let rows = vec![
        tx(1, "2024-13-45", TxType::Income, "Salary", "100"),
        tx(2, "2024-01-01", TxType::Income, "Salary", "50"),
    ];
    assert_eq!(totals_by_type(&rows).income_total, dec("150"));
    let months = monthly_breakdown(&rows, 2024);
    let income: Decimal = months.iter().map(|m| m.income_total).sum();
    assert_eq!(income, dec("50"));
}

#[test]
fn running_balance_accumulates_month_by_month() {
    let months = monthly_breakdown(&scenario(), 2024);
    let running = running_balances(&months);
    assert_eq!(running.len(), 12);
    assert_eq!(running[0], dec("600"));
    assert_eq!(running[1], dec("500"));
    assert_eq!(running[11], dec("500"));
}

#[test]
fn monthly_average_divides_by_twelve() {
    let avg = monthly_average(&Totals {
        income_total: dec("1200"),
        expense_total: dec("600"),
        balance: dec("600"),
    });
    assert_eq!(avg.income_total, dec("100"));
    assert_eq!(avg.expense_total, dec("50"));
    assert_eq!(avg.balance, dec("50"));
}

#[test]
fn dashboard_combines_all_time_month_and_year() {
    let mut rows = scenario();
    rows.push(tx(4, "2023-06-01", TxType::Income, "Salary", "300"));
    let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();

    let m = dashboard_metrics(&rows, today, 2024);
    assert_eq!(m.current_balance, dec("800"));
    assert_eq!(m.month.expense_total, dec("100"));
    assert_eq!(m.month.balance, dec("-100"));
    assert_eq!(m.yearly.len(), 12);
    assert_eq!(m.yearly[0].balance, dec("600"));
}

#[test]
fn oversized_amounts_do_not_overflow_the_sums() {
    let huge = "79228162514264337593543950335";
    let rows = vec![
        tx(1, "2024-01-15", TxType::Income, "Salary", huge),
        tx(2, "2024-01-16", TxType::Income, "Salary", huge),
        tx(3, "2024-01-17", TxType::Expense, "Food", huge),
        tx(4, "2024-01-18", TxType::Expense, "Food", huge),
    ];

    let totals = totals_by_type(&rows);
    assert_eq!(totals.income_total, Decimal::MAX);
    assert_eq!(totals.expense_total, Decimal::MAX);
    assert!(totals.balance.is_zero());

    let months = monthly_breakdown(&rows, 2024);
    assert_eq!(months[0].income_total, Decimal::MAX);
    assert_eq!(running_balances(&months).len(), 12);

    let cats = category_breakdown(&rows);
    assert_eq!(cats.len(), 2);
    assert!(cats.iter().all(|c| c.count == 2 && c.total == Decimal::MAX));
    let share: f64 = cats.iter().map(|c| c.percent_of_total).sum();
    assert!((share - 100.0).abs() < 1e-6);

    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let m = dashboard_metrics(&rows, today, 2024);
    assert!(m.current_balance.is_zero());
}
