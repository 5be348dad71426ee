#![doc(test(attr(deny(warnings))))]

//! Trip planning core: a date-ranged itinerary, a shopping list, and a
//! JPY/TWD expense ledger with rewards-card estimates, persisted as JSON and
//! driven by an interactive shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod itinerary;
pub mod ledger;
pub mod remote;
pub mod shopping;
pub mod storage;
pub mod transfer;
pub mod utils;
pub mod weather;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("trip planner tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
