//! The append-only record of every trade the engine has committed.

use std::sync::Mutex;

use crate::engine::trade::Trade;
use crate::utils::lock_or_abort;

/// An in-memory, queryable trade history behind a single lock. Durable
/// persistence is out of scope.
#[derive(Debug, Default)]
pub(crate) struct TradeJournal {
    trades: Mutex<Vec<Trade>>,
}

impl TradeJournal {
    pub(crate) fn new() -> Self {
        Self {
            trades: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn append(&self, new_trades: &[Trade]) {
        if new_trades.is_empty() {
            return;
        }
        lock_or_abort(&self.trades).extend_from_slice(new_trades);
    }

    pub(crate) fn snapshot(&self) -> Vec<Trade> {
        lock_or_abort(&self.trades).clone()
    }
}
