// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Explicit change notification for views that depend on stored data.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    TransactionAdded(i64),
    TransactionUpdated(i64),
    TransactionDeleted(i64),
    TransactionsCleared { removed: usize },
    CategoryAdded(i64),
    CategoryDeleted(i64),
}

impl Change {
    pub fn touches_transactions(&self) -> bool {
        matches!(
            self,
            Change::TransactionAdded(_)
                | Change::TransactionUpdated(_)
                | Change::TransactionDeleted(_)
                | Change::TransactionsCleared { .. }
        )
    }
}

type Observer = Box<dyn Fn(&Change)>;

/// Observers are called in registration order after a mutation succeeds.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<Observer>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, f: F)
    where
        F: Fn(&Change) + 'static,
    {
        self.observers.push(Box::new(f));
    }

    pub fn notify(&self, change: &Change) {
        debug!(?change, observers = self.observers.len(), "notifying observers");
        for o in &self.observers {
            o(change);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
