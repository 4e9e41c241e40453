// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped access to transactions and categories.
//!
//! Every statement carries `owner=?`; a row belonging to someone else is
//! indistinguishable from a missing one.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::errors::StoreError;
use crate::events::{Change, ChangeNotifier};
use crate::models::{
    Category, MAX_AMOUNT, NewTransaction, Transaction, TransactionPatch, TxDate, TxType,
};

impl ToSql for TxType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TxType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Query for [`Ledger::list_transactions`]. Empty filter lists everything.
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub month: Option<(i32, u32)>,
    pub year: Option<i32>,
    pub r#type: Option<TxType>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl TxFilter {
    pub fn month(year: i32, month: u32) -> Self {
        TxFilter {
            month: Some((year, month)),
            ..Default::default()
        }
    }

    pub fn year(year: i32) -> Self {
        TxFilter {
            year: Some(year),
            ..Default::default()
        }
    }
}

const TX_COLUMNS: &str = "id, owner, date, type, category, description, amount";

pub struct Ledger<'c> {
    conn: &'c Connection,
    owner: String,
    notifier: ChangeNotifier,
}

impl<'c> Ledger<'c> {
    pub fn new(conn: &'c Connection, owner: impl Into<String>) -> Self {
        Ledger {
            conn,
            owner: owner.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub fn list_transactions(&self, filter: &TxFilter) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = format!("SELECT {} FROM transactions WHERE owner=?", TX_COLUMNS);
        let mut args: Vec<Value> = vec![Value::Text(self.owner.clone())];

        if let Some((y, m)) = filter.month {
            sql.push_str(" AND substr(date,1,7)=?");
            args.push(Value::Text(format!("{:04}-{:02}", y, m)));
        }
        if let Some(y) = filter.year {
            sql.push_str(" AND substr(date,1,4)=?");
            args.push(Value::Text(format!("{:04}", y)));
        }
        if let Some(t) = filter.r#type {
            sql.push_str(" AND type=?");
            args.push(Value::Text(t.as_str().to_string()));
        }
        if let Some(cat) = &filter.category {
            sql.push_str(" AND category=?");
            args.push(Value::Text(cat.clone()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if filter.limit.is_some() || filter.offset > 0 {
            sql.push_str(" LIMIT ? OFFSET ?");
            // SQLite treats a negative limit as "no limit"
            args.push(Value::Integer(
                filter.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX)),
            ));
            args.push(Value::Integer(
                i64::try_from(filter.offset).unwrap_or(i64::MAX),
            ));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), tx_from_row)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    pub fn get_transaction(&self, id: i64) -> Result<Transaction, StoreError> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE id=?1 AND owner=?2",
            TX_COLUMNS
        );
        self.conn
            .query_row(&sql, params![id, self.owner], tx_from_row)
            .optional()?
            .ok_or(StoreError::NotFound {
                what: "transaction",
                id,
            })
    }

    pub fn add_transaction(&self, tx: &NewTransaction) -> Result<Transaction, StoreError> {
        validate_category(&tx.category)?;
        validate_amount(&tx.amount)?;
        self.conn.execute(
            "INSERT INTO transactions(owner, date, type, category, description, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.owner,
                tx.date.to_string(),
                tx.r#type,
                tx.category.trim(),
                tx.description,
                tx.amount.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, owner = %self.owner, "transaction added");
        self.notifier.notify(&Change::TransactionAdded(id));
        self.get_transaction(id)
    }

    pub fn update_transaction(
        &self,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Invalid("nothing to update".into()));
        }
        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<Value> = Vec::new();
        if let Some(d) = patch.date {
            sets.push("date=?");
            args.push(Value::Text(d.to_string()));
        }
        if let Some(t) = patch.r#type {
            sets.push("type=?");
            args.push(Value::Text(t.as_str().to_string()));
        }
        if let Some(c) = &patch.category {
            validate_category(c)?;
            sets.push("category=?");
            args.push(Value::Text(c.trim().to_string()));
        }
        if let Some(desc) = &patch.description {
            sets.push("description=?");
            args.push(Value::Text(desc.clone()));
        }
        if let Some(a) = &patch.amount {
            validate_amount(a)?;
            sets.push("amount=?");
            args.push(Value::Text(a.to_string()));
        }
        let sql = format!(
            "UPDATE transactions SET {}, updated_at=datetime('now') WHERE id=? AND owner=?",
            sets.join(", ")
        );
        args.push(Value::Integer(id));
        args.push(Value::Text(self.owner.clone()));

        let changed = self.conn.execute(&sql, params_from_iter(args.iter()))?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                what: "transaction",
                id,
            });
        }
        info!(id, owner = %self.owner, "transaction updated");
        self.notifier.notify(&Change::TransactionUpdated(id));
        self.get_transaction(id)
    }

    pub fn delete_transaction(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner=?2",
            params![id, self.owner],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                what: "transaction",
                id,
            });
        }
        info!(id, owner = %self.owner, "transaction deleted");
        self.notifier.notify(&Change::TransactionDeleted(id));
        Ok(())
    }

    /// Removes every transaction of the owner and returns how many went.
    pub fn clear_transactions(&self) -> Result<usize, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM transactions WHERE owner=?1",
            params![self.owner],
        )?;
        warn!(removed, owner = %self.owner, "all transactions cleared");
        self.notifier
            .notify(&Change::TransactionsCleared { removed });
        Ok(removed)
    }

    pub fn list_categories(&self, r#type: Option<TxType>) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner, name, type FROM categories
             WHERE owner=?1 AND (?2 IS NULL OR type=?2)
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![self.owner, r#type], |r| {
            Ok(Category {
                id: r.get(0)?,
                owner: r.get(1)?,
                name: r.get(2)?,
                r#type: r.get(3)?,
            })
        })?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    pub fn add_category(&self, name: &str, r#type: TxType) -> Result<Category, StoreError> {
        validate_category(name)?;
        let name = name.trim();
        self.conn.execute(
            "INSERT INTO categories(owner, name, type) VALUES (?1, ?2, ?3)",
            params![self.owner, name, r#type],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, owner = %self.owner, name, "category added");
        self.notifier.notify(&Change::CategoryAdded(id));
        Ok(Category {
            id,
            owner: self.owner.clone(),
            name: name.to_string(),
            r#type,
        })
    }

    pub fn delete_category(&self, id: i64) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM categories WHERE id=?1 AND owner=?2",
            params![id, self.owner],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                what: "category",
                id,
            });
        }
        info!(id, owner = %self.owner, "category deleted");
        self.notifier.notify(&Change::CategoryDeleted(id));
        Ok(())
    }
}

fn validate_category(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Invalid("category must not be empty".into()));
    }
    Ok(())
}

fn validate_amount(amount: &Decimal) -> Result<(), StoreError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(StoreError::Invalid(format!(
            "amount {} must not be negative",
            amount
        )));
    }
    if *amount > MAX_AMOUNT {
        return Err(StoreError::Invalid(format!(
            "amount {} exceeds the maximum of {}",
            amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

fn tx_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: i64 = r.get(0)?;
    let date_raw: String = r.get(2)?;
    let amount_raw: String = r.get(6)?;

    let date = TxDate::parse(&date_raw);
    if let TxDate::Invalid(raw) = &date {
        warn!(id, date = %raw, "transaction has an unreadable date");
    }

    Ok(Transaction {
        id,
        owner: r.get(1)?,
        date,
        r#type: r.get(3)?,
        category: r.get(4)?,
        description: r.get(5)?,
        amount: amount_or_zero(id, &amount_raw),
    })
}

fn amount_or_zero(id: i64, raw: &str) -> Decimal {
    match raw.trim().parse::<Decimal>() {
        Ok(d) if d.is_sign_negative() && !d.is_zero() => {
            warn!(id, amount = raw, "negative stored amount, counting it as zero");
            Decimal::ZERO
        }
        Ok(d) if d > MAX_AMOUNT => {
            warn!(id, amount = raw, "stored amount above the maximum, counting it as zero");
            Decimal::ZERO
        }
        Ok(d) => d,
        Err(_) => {
            warn!(id, amount = raw, "unreadable stored amount, counting it as zero");
            Decimal::ZERO
        }
    }
}
