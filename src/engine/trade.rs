//! The record produced each time two orders cross.

use serde::{Deserialize, Serialize};

use crate::engine::order::{OrderId, Price, SymbolIndex};

/// One execution between a resting order and an incoming order.
///
/// `ts` is a [`MonotonicClock`](crate::utils::MonotonicClock) tick, not a
/// wall-clock timestamp — see that type's docs for why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub buy_id: OrderId,
    pub sell_id: OrderId,
    pub symbol: SymbolIndex,
    pub qty: u64,
    pub price: Price,
    pub ts: u64,
}
