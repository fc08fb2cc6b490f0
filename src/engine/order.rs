//! Order identity and the small value types every other component shares.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::error::EngineError;

/// Unique integer assigned by the [`IdGenerator`](crate::engine::id_generator::IdGenerator)
/// at submission time. Monotonic but not necessarily gap-free under
/// contention.
pub type OrderId = u64;

/// BUY or SELL. An invalid side cannot be constructed — the type system
/// enforces the "one of two valid variants" precondition instead of a
/// runtime check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A dense index into `[0, max_symbols)`, assigned by the symbol registry.
///
/// Construction is crate-private: callers only ever obtain one from
/// [`Engine::submit`](crate::Engine::submit) or
/// [`Engine::index_of`](crate::Engine::index_of), so a `SymbolIndex` in
/// hand is always valid for the `Engine` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolIndex(pub(crate) u32);

impl SymbolIndex {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw `[0, max_symbols)` index.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positive price expressed as an integer count of minimum price
/// increments ("ticks").
///
/// Price comparison must be exact; representing price as an integer tick
/// count rather than a float gives that for free, at the cost of pushing
/// the decimal-scale decision (how many ticks per currency unit) out to
/// whoever constructs the `Price` — an out-of-scope gateway, not this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(u64);

impl Price {
    /// Builds a `Price` from a raw tick count. Fails if `ticks` is zero:
    /// price must be strictly positive.
    pub fn new(ticks: u64) -> Result<Self, EngineError> {
        if ticks == 0 {
            return Err(EngineError::invalid("price must be strictly positive"));
        }
        Ok(Self(ticks))
    }

    /// The raw tick count.
    pub fn ticks(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The immutable identity of an order: everything about it that never
/// changes once accepted.
///
/// `remaining_qty` and `active` are deliberately not fields here — they
/// live behind the book's version-CAS commit
/// ([`engine::price_level::OrderSlot`](crate::engine::price_level::OrderSlot))
/// so that a single commit publishes several orders' quantity/active state
/// together as one atomic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub symbol: SymbolIndex,
    pub price: Price,
    pub arrival_ts: u64,
}
