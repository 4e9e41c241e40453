// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::rc::Rc;

use cashtrack::aggregate::totals_by_type;
use cashtrack::db;
use cashtrack::errors::StoreError;
use cashtrack::events::Change;
use cashtrack::format::INVALID_DATE_LABEL;
use cashtrack::models::{MAX_AMOUNT, NewTransaction, TransactionPatch, TxDate, TxType};
use cashtrack::report::{ReportBuilder, ReportOptions, SectionKind};
use cashtrack::store::{Ledger, TxFilter};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn new_tx(date: &str, t: TxType, category: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        r#type: t,
        category: category.into(),
        description: format!("{} on {}", category, date),
        amount: amount.parse().unwrap(),
    }
}

fn seed(ledger: &Ledger) {
    for (date, t, cat, amt) in [
        ("2024-01-15", TxType::Income, "Salary", "1000"),
        ("2024-01-20", TxType::Expense, "Food", "400"),
        ("2024-02-01", TxType::Expense, "Food", "100"),
        ("2023-12-31", TxType::Expense, "Leisure", "30"),
    ] {
        ledger.add_transaction(&new_tx(date, t, cat, amt)).unwrap();
    }
}

#[test]
fn list_is_newest_first() {
    let conn = setup();
    let ledger = Ledger::new(&conn, "alice");
    seed(&ledger);

    let rows = ledger.list_transactions(&TxFilter::default()).unwrap();
    let dates: Vec<TxDate> = rows.iter().map(|r| r.date.clone()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(dates[0], TxDate::parse("2024-02-01"));
    assert_eq!(dates[3], TxDate::parse("2023-12-31"));
}

#[test]
fn filters_combine() {
    let conn = setup();
    let ledger = Ledger::new(&conn, "alice");
    seed(&ledger);

    assert_eq!(ledger.list_transactions(&TxFilter::month(2024, 1)).unwrap().len(), 2);
    assert_eq!(ledger.list_transactions(&TxFilter::year(2024)).unwrap().len(), 3);

    let food_2024 = TxFilter {
        year: Some(2024),
        r#type: Some(TxType::Expense),
        category: Some("Food".into()),
        ..Default::default()
    };
    let rows = ledger.list_transactions(&food_2024).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.category == "Food"));

    let paged = TxFilter {
        limit: Some(2),
        offset: 2,
        ..Default::default()
    };
    let rows = ledger.list_transactions(&paged).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, TxDate::parse("2024-01-15"));
}

#[test]
fn other_owners_rows_are_invisible() {
    let conn = setup();
    let alice = Ledger::new(&conn, "alice");
    let bob = Ledger::new(&conn, "bob");
    seed(&alice);
    let bobs = bob
        .add_transaction(&new_tx("2024-01-01", TxType::Income, "Sales", "5"))
        .unwrap();

    assert_eq!(bob.list_transactions(&TxFilter::default()).unwrap().len(), 1);
    assert!(matches!(
        alice.get_transaction(bobs.id),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        alice.delete_transaction(bobs.id),
        Err(StoreError::NotFound { .. })
    ));
    let patch = TransactionPatch {
        amount: Some(Decimal::ONE),
        ..Default::default()
    };
    assert!(matches!(
        alice.update_transaction(bobs.id, &patch),
        Err(StoreError::NotFound { .. })
    ));

    assert_eq!(alice.clear_transactions().unwrap(), 4);
    assert_eq!(bob.list_transactions(&TxFilter::default()).unwrap().len(), 1);
}

#[test]
fn update_applies_only_given_fields() {
    let conn = setup();
    let ledger = Ledger::new(&conn, "alice");
    let saved = ledger
        .add_transaction(&new_tx("2024-05-05", TxType::Expense, "Food", "12.30"))
        .unwrap();

    let patch = TransactionPatch {
        category: Some("Transport".into()),
        amount: Some("15".parse().unwrap()),
        ..Default::default()
    };
    let updated = ledger.update_transaction(saved.id, &patch).unwrap();
    assert_eq!(updated.category, "Transport");
    assert_eq!(updated.amount, "15".parse::<Decimal>().unwrap());
    assert_eq!(updated.date, saved.date);
    assert_eq!(updated.r#type, TxType::Expense);
    assert_eq!(updated.description, saved.description);

    assert!(matches!(
        ledger.update_transaction(saved.id, &TransactionPatch::default()),
        Err(StoreError::Invalid(_))
    ));
}

#[test]
fn negative_amounts_and_blank_categories_are_rejected() {
    let conn = setup();
    let ledger = Ledger::new(&conn, "alice");
    assert!(matches!(
        ledger.add_transaction(&new_tx("2024-05-05", TxType::Expense, "Food", "-1")),
        Err(StoreError::Invalid(_))
    ));
    assert!(matches!(
        ledger.add_transaction(&new_tx("2024-05-05", TxType::Expense, "  ", "1")),
        Err(StoreError::Invalid(_))
    ));
    assert!(ledger.list_transactions(&TxFilter::default()).unwrap().is_empty());
}

#[test]
fn malformed_rows_degrade_instead_of_failing() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(owner, date, type, category, description, amount)
         VALUES (?1, 'not-a-date', 'expense', 'Food', 'bad date', '12')",
        params!["alice"],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(owner, date, type, category, description, amount)
         VALUES (?1, '2024-01-02', 'income', 'Salary', 'bad amount', 'lots')",
        params!["alice"],
    )
    .unwrap();

    let ledger = Ledger::new(&conn, "alice");
    let rows = ledger.list_transactions(&TxFilter::default()).unwrap();
    assert_eq!(rows.len(), 2);

    let bad_date = rows.iter().find(|r| r.description == "bad date").unwrap();
    assert_eq!(bad_date.date, TxDate::Invalid("not-a-date".into()));
    assert_eq!(bad_date.amount, "12".parse::<Decimal>().unwrap());

    let bad_amount = rows.iter().find(|r| r.description == "bad amount").unwrap();
    assert_eq!(bad_amount.amount, Decimal::ZERO);

    // the unreadable date falls outside every month window
    assert_eq!(ledger.list_transactions(&TxFilter::month(2024, 1)).unwrap().len(), 1);
}

#[test]
fn categories_are_owner_scoped() {
    let conn = setup();
    let alice = Ledger::new(&conn, "alice");
    let bob = Ledger::new(&conn, "bob");

    let pets = alice.add_category("Pets", TxType::Expense).unwrap();
    alice.add_category("Bonus", TxType::Income).unwrap();
    bob.add_category("Pets", TxType::Expense).unwrap();

    assert_eq!(alice.list_categories(None).unwrap().len(), 2);
    let expenses = alice.list_categories(Some(TxType::Expense)).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].name, "Pets");

    assert!(matches!(
        bob.delete_category(pets.id),
        Err(StoreError::NotFound { .. })
    ));
    alice.delete_category(pets.id).unwrap();
    assert_eq!(alice.list_categories(None).unwrap().len(), 1);
    assert_eq!(bob.list_categories(None).unwrap().len(), 1);
}

#[test]
fn observers_hear_about_successful_mutations_only() {
    let conn = setup();
    let mut ledger = Ledger::new(&conn, "alice");
    let seen: Rc<RefCell<Vec<Change>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        ledger
            .notifier_mut()
            .subscribe(move |c| seen.borrow_mut().push(c.clone()));
    }

    let saved = ledger
        .add_transaction(&new_tx("2024-05-05", TxType::Expense, "Food", "1"))
        .unwrap();
    let _ = ledger.delete_transaction(saved.id + 100);
    ledger.delete_transaction(saved.id).unwrap();
    let cat = ledger.add_category("Pets", TxType::Expense).unwrap();

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            Change::TransactionAdded(saved.id),
            Change::TransactionDeleted(saved.id),
            Change::CategoryAdded(cat.id),
        ]
    );
    assert!(seen[0].touches_transactions());
    assert!(!seen[2].touches_transactions());
}

#[test]
fn amounts_above_the_ceiling_are_rejected() {
    let conn = setup();
    let ledger = Ledger::new(&conn, "alice");
    let huge = "79228162514264337593543950335";
    assert!(matches!(
        ledger.add_transaction(&new_tx("2024-01-01", TxType::Income, "Salary", huge)),
        Err(StoreError::Invalid(_))
    ));

    let saved = ledger
        .add_transaction(&NewTransaction {
            amount: MAX_AMOUNT,
            ..new_tx("2024-01-01", TxType::Income, "Salary", "1")
        })
        .unwrap();
    let patch = TransactionPatch {
        amount: Some(MAX_AMOUNT + Decimal::ONE),
        ..Default::default()
    };
    assert!(matches!(
        ledger.update_transaction(saved.id, &patch),
        Err(StoreError::Invalid(_))
    ));

    assert!(cashtrack::utils::parse_amount(huge).is_err());
    assert_eq!(
        cashtrack::utils::parse_amount("1000000000000000").unwrap(),
        MAX_AMOUNT
    );
}

#[test]
fn oversized_stored_amounts_count_as_zero() {
    let conn = setup();
    for _ in 0..2 {
        conn.execute(
            "INSERT INTO transactions(owner, date, type, category, description, amount)
             VALUES (?1, '2024-01-02', 'income', 'Salary', 'huge', '79228162514264337593543950335')",
            params!["alice"],
        )
        .unwrap();
    }
    let ledger = Ledger::new(&conn, "alice");
    ledger
        .add_transaction(&new_tx("2024-01-03", TxType::Income, "Salary", "5"))
        .unwrap();

    let rows = ledger.list_transactions(&TxFilter::year(2024)).unwrap();
    assert_eq!(rows.len(), 3);
    let totals = totals_by_type(&rows);
    assert_eq!(totals.income_total, "5".parse::<Decimal>().unwrap());
}

#[test]
fn undated_rows_fetched_for_a_month_reach_the_report() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(owner, date, type, category, description, amount)
         VALUES (?1, '2024-03-3x', 'expense', 'Food', 'smudged', '8')",
        params!["alice"],
    )
    .unwrap();
    let ledger = Ledger::new(&conn, "alice");
    let rows = ledger.list_transactions(&TxFilter::month(2024, 3)).unwrap();
    assert_eq!(rows.len(), 1);

    let at = NaiveDate::from_ymd_opt(2024, 3, 31)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let report =
        ReportBuilder::new(ReportOptions::default(), at).build_monthly_report(&rows, 2024, 3);
    let detail = report.section(SectionKind::DetailedTransactions).unwrap();
    assert!(!detail.is_placeholder());
    let table = detail.table().unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][0], INVALID_DATE_LABEL);
    assert_eq!(table.rows[0][3], "smudged");
}
