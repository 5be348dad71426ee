//! Cashback program of the rewards card.
//!
//! Every TWD-equivalent spent earns a flat base rate plus a bonus rate. The
//! bonus is capped, which makes [`BONUS_THRESHOLD_TWD`] the spend at which the
//! bonus stops growing. JPY spending carries the card's foreign transaction
//! fee before rewards are computed.

use crate::currency::{Currency, ExchangeRate};
use crate::domain::ExpenseRecord;
use crate::utils::round_to_i64;

pub const BASE_REWARD_RATE: f64 = 0.01;
pub const BONUS_REWARD_RATE: f64 = 0.04;
pub const BONUS_REWARD_CAP: i64 = 600;
pub const BONUS_THRESHOLD_TWD: f64 = 15000.0;
pub const FOREIGN_TRANSACTION_MARKUP: f64 = 1.015;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardStats {
    /// Total card spend in TWD, rounded once.
    pub spent_twd: i64,
    pub base_reward: i64,
    pub bonus_reward: i64,
    pub total_reward: i64,
    /// Progress toward the bonus threshold, 0..=100.
    pub progress_percent: i64,
}

impl RewardStats {
    /// Derives every reward figure from an already-rounded TWD spend.
    pub fn from_spent(spent_twd: i64) -> Self {
        let spent = spent_twd as f64;
        let base_reward = round_to_i64(spent * BASE_REWARD_RATE);
        let bonus_reward = round_to_i64(spent * BONUS_REWARD_RATE).min(BONUS_REWARD_CAP);
        let progress_percent = round_to_i64(spent / BONUS_THRESHOLD_TWD * 100.0).min(100);
        Self {
            spent_twd,
            base_reward,
            bonus_reward,
            total_reward: base_reward + bonus_reward,
            progress_percent,
        }
    }

    pub fn bonus_capped(&self) -> bool {
        self.bonus_reward >= BONUS_REWARD_CAP
    }
}

/// TWD charged on the card for one record, fee included for JPY.
pub fn card_charge_twd(record: &ExpenseRecord, rate: ExchangeRate) -> f64 {
    let amount = record.amount.whole_units() as f64;
    match record.currency {
        Currency::Twd => amount,
        Currency::Jpy => rate.jpy_to_twd(amount) * FOREIGN_TRANSACTION_MARKUP,
    }
}

/// Reward statistics over `records`; the caller decides which records qualify.
pub fn card_stats<'a>(
    records: impl IntoIterator<Item = &'a ExpenseRecord>,
    rate: ExchangeRate,
) -> RewardStats {
    let total: f64 = records
        .into_iter()
        .map(|record| card_charge_twd(record, rate))
        .sum();
    RewardStats::from_spent(round_to_i64(total))
}
