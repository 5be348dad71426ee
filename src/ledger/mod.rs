//! Expense list, currency totals, and the rewards-card calculator.

pub mod rewards;

use serde::{Deserialize, Serialize};

use crate::currency::{Currency, ExchangeRate};
use crate::domain::{ExpenseForm, ExpenseRecord, IdGenerator, PaymentMethod};
use crate::errors::{Result, TripError};
use crate::utils::round_to_i64;

pub use rewards::{
    card_stats, RewardStats, BASE_REWARD_RATE, BONUS_REWARD_CAP, BONUS_REWARD_RATE,
    BONUS_THRESHOLD_TWD, FOREIGN_TRANSACTION_MARKUP,
};

/// Grand totals expressed in each currency, each rounded once at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpenseTotals {
    pub jpy: i64,
    pub twd: i64,
}

/// What `save` did with a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created(i64),
    Updated(i64),
}

/// Newest-first list of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseLedger {
    records: Vec<ExpenseRecord>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&ExpenseRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|record| record.id).max()
    }

    /// Stores a form: without an id it becomes a new record at the front of the
    /// list; with an id it overwrites that record where it stands.
    pub fn save(&mut self, form: ExpenseForm, ids: &mut IdGenerator) -> Result<SaveKind> {
        form.validate()?;
        match form.id {
            Some(id) => {
                let slot = self
                    .records
                    .iter_mut()
                    .find(|record| record.id == id)
                    .ok_or(TripError::ExpenseNotFound(id))?;
                *slot = form.into_record(id);
                tracing::debug!(id, "updated expense");
                Ok(SaveKind::Updated(id))
            }
            None => {
                let id = ids.next_id();
                self.records.insert(0, form.into_record(id));
                tracing::debug!(id, "added expense");
                Ok(SaveKind::Created(id))
            }
        }
    }

    pub fn remove(&mut self, id: i64) -> Result<ExpenseRecord> {
        let idx = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(TripError::ExpenseNotFound(id))?;
        Ok(self.records.remove(idx))
    }

    /// Clears the list, then takes every record from `records` in order.
    pub fn replace_all(&mut self, records: Vec<ExpenseRecord>) {
        self.records.clear();
        self.records.extend(records);
    }

    /// Sums every record in both currencies at `rate` (TWD per JPY).
    pub fn totals(&self, rate: ExchangeRate) -> ExpenseTotals {
        let (jpy, twd) = self
            .records
            .iter()
            .fold((0.0_f64, 0.0_f64), |(jpy, twd), record| {
                let amount = record.amount.whole_units() as f64;
                match record.currency {
                    Currency::Twd => (jpy + rate.twd_to_jpy(amount), twd + amount),
                    Currency::Jpy => (jpy + amount, twd + rate.jpy_to_twd(amount)),
                }
            });
        ExpenseTotals {
            jpy: round_to_i64(jpy),
            twd: round_to_i64(twd),
        }
    }

    /// Reward statistics for every record paid with `method`.
    pub fn card_stats(&self, method: &PaymentMethod, rate: ExchangeRate) -> RewardStats {
        card_stats(
            self.records.iter().filter(|record| &record.payment == method),
            rate,
        )
    }

    pub fn rewards_card_stats(&self, rate: ExchangeRate) -> RewardStats {
        self.card_stats(&PaymentMethod::RewardsCard, rate)
    }
}
